//! Voices command handler.
//!
//! Waits for the voice catalog and shows which voice the current settings
//! would select.

use std::fmt::Write as _;

use anyhow::Result;
use speakdoc_core::VoiceDescriptor;
use speakdoc_voice::VoiceSelector;

use crate::bootstrap::CliContext;

pub async fn execute(ctx: &CliContext, json: bool) -> Result<()> {
    let voices = ctx.catalog.wait_ready().await;
    let selected = VoiceSelector::from_settings(&ctx.settings).select(&voices);

    if json {
        let body = serde_json::json!({
            "backend": ctx.backend.name(),
            "voices": voices,
            "selected": selected,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    if voices.is_empty() {
        println!(
            "No voices reported by {}; its default voice will be used.",
            ctx.backend.name()
        );
        return Ok(());
    }

    println!("{} voice(s) from {}:\n", voices.len(), ctx.backend.name());
    print!("{}", render_table(&voices, selected.as_ref())?);
    Ok(())
}

fn render_table(voices: &[VoiceDescriptor], selected: Option<&VoiceDescriptor>) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "   {:<32} Language", "Name")?;
    for voice in voices {
        let marker = if selected == Some(voice) { '*' } else { ' ' };
        writeln!(out, " {marker} {:<32} {}", voice.name, voice.lang)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use speakdoc_core::ReaderSettings;

    use super::*;
    use crate::bootstrap::{Synthesizer, bootstrap};

    #[test]
    fn marks_selected_voice() {
        let voices = vec![
            VoiceDescriptor::new("Microsoft Mark", "en-GB"),
            VoiceDescriptor::new("Samantha", "en-US"),
        ];
        let table = render_table(&voices, Some(&voices[1])).unwrap();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("   Microsoft Mark"));
        assert!(lines[2].starts_with(" * Samantha"));
    }

    #[test]
    fn paced_voices_listed() {
        tokio_test::block_on(async {
            let ctx = bootstrap(ReaderSettings::default(), &Synthesizer::Paced);
            execute(&ctx, true).await.unwrap();
        });
    }
}
