//! Segment command handler.
//!
//! Loads a document and prints the units it would be read as.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use speakdoc_core::DocumentSource;
use speakdoc_voice::{Normalizer, Segment, segment_text};

use crate::bootstrap::CliContext;
use crate::error::CliError;

pub async fn execute(ctx: &CliContext, file: &Path, json: bool) -> Result<()> {
    let document = ctx.source.load(file).await.map_err(CliError::from)?;

    let Some(text) = document.readable_text() else {
        println!("{} has no readable text.", file.display());
        return Ok(());
    };

    let normalizer = Normalizer::from_settings(&ctx.settings);
    let segments = segment_text(text, ctx.settings.effective_granularity(), &normalizer);
    tracing::debug!(units = segments.len(), kind = %document.kind, "Document segmented");

    print!("{}", render(&segments, json)?);
    Ok(())
}

fn render(segments: &[Segment], json: bool) -> Result<String> {
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(segments)?));
    }

    let mut out = String::new();
    for segment in segments {
        writeln!(out, "{:>5}  {}", segment.index, segment.content.trim_end())?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use speakdoc_core::{Granularity, ReaderSettings};

    use super::*;
    use crate::bootstrap::{Synthesizer, bootstrap};

    #[test]
    fn renders_numbered_units() {
        let segments = segment_text(
            "Dr. Smith left. He returned.",
            Granularity::Sentence,
            &Normalizer::default(),
        );
        assert_eq!(
            render(&segments, false).unwrap(),
            "    0  Dr. Smith left.\n    1  He returned.\n"
        );
    }

    #[test]
    fn renders_json() {
        let segments = segment_text("one two", Granularity::Word, &Normalizer::default());
        let out = render(&segments, true).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["content"], "one ");
        assert_eq!(parsed[1]["index"], 1);
    }

    #[tokio::test]
    async fn missing_file_is_document_error() {
        let ctx = bootstrap(ReaderSettings::default(), &Synthesizer::Paced);
        let err = execute(&ctx, Path::new("/nonexistent/speakdoc.txt"), false)
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<CliError>().is_some());
    }

    #[tokio::test]
    async fn pdf_reports_cli_limitation() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        write!(file, "%PDF-1.4").unwrap();

        let ctx = bootstrap(ReaderSettings::default(), &Synthesizer::Paced);
        let err = execute(&ctx, file.path(), false).await.unwrap_err();
        let err = err.downcast_ref::<CliError>().unwrap();
        assert!(err.to_string().contains(crate::error::PDF_UNSUPPORTED));
        assert_eq!(err.exit_code(), 66);
    }

    #[tokio::test]
    async fn segments_text_file() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "Hello there.").unwrap();

        let ctx = bootstrap(ReaderSettings::default(), &Synthesizer::Paced);
        execute(&ctx, file.path(), false).await.unwrap();
    }
}
