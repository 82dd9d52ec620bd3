//! Command execution against an artifact store.

use std::error::Error;
use std::io::Write;
use std::path::Path;

use boefjes_application::ArtifactStore;
use boefjes_domain::{BoefjeMeta, MimeTypes, NormalizerMeta};
use boefjes_infrastructure::{InMemoryEventSink, from_json_bytes, to_json_stable};

use crate::cli::Command;

/// Result type for command execution.
pub type CommandResult = Result<(), Box<dyn Error>>;

/// Runs `command`, writing metas, raw payloads and emitted queue events to `out`.
pub async fn execute<W: Write>(
    command: Command,
    store: &dyn ArtifactStore,
    events: &InMemoryEventSink,
    out: &mut W,
) -> CommandResult {
    match command {
        Command::Login => {
            store.login().await?;
            writeln!(out, "logged in")?;
        }
        Command::SaveBoefjeMeta { file } => {
            let boefje_meta: BoefjeMeta = read_json(&file).await?;
            store.save_boefje_meta(&boefje_meta).await?;
            tracing::info!(id = %boefje_meta.id, "saved boefje meta");
        }
        Command::GetBoefjeMeta { id } => {
            let boefje_meta = store.get_boefje_meta(&id).await?;
            write!(out, "{}", to_json_stable(&boefje_meta)?)?;
        }
        Command::SaveNormalizerMeta { file } => {
            let normalizer_meta: NormalizerMeta = read_json(&file).await?;
            store.save_normalizer_meta(&normalizer_meta).await?;
            tracing::info!(id = %normalizer_meta.id, "saved normalizer meta");
        }
        Command::GetNormalizerMeta { id } => {
            let normalizer_meta = store.get_normalizer_meta(&id).await?;
            write!(out, "{}", to_json_stable(&normalizer_meta)?)?;
        }
        Command::SaveRaw {
            id,
            file,
            mime_types,
            guess_mime_type,
        } => {
            let mut labels: MimeTypes = mime_types.into_iter().collect();
            if guess_mime_type {
                match mime_guess::from_path(&file).first() {
                    Some(guessed) => {
                        labels.insert(guessed.to_string());
                    }
                    None => tracing::warn!(file = %file.display(), "no mime type known for file"),
                }
            }

            let raw = tokio::fs::read(&file).await?;
            store.save_raw_with_mime_types(&id, &raw, &labels).await?;
            tracing::info!(id = %id, size = raw.len(), "saved raw data");
        }
        Command::GetRaw { id, output } => {
            let raw = store.get_raw(&id).await?;
            match output {
                Some(path) => tokio::fs::write(&path, &raw).await?,
                None => out.write_all(&raw)?,
            }
        }
    }

    print_events(events, out).await
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Box<dyn Error>> {
    let bytes = tokio::fs::read(path).await?;
    Ok(from_json_bytes(&bytes)?)
}

/// Drains every queue and prints its events.
async fn print_events<W: Write>(events: &InMemoryEventSink, out: &mut W) -> CommandResult {
    for queue in events.queue_names().await {
        for event in events.drain(&queue).await {
            tracing::debug!(queue = %queue, "emitted event");
            write!(out, "{}", to_json_stable(&event)?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    use boefjes_application::Notifier;
    use boefjes_domain::{Boefje, Normalizer};
    use boefjes_infrastructure::{InMemoryBytesClient, SystemClock};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    struct Harness {
        store: InMemoryBytesClient,
        events: InMemoryEventSink,
        dir: TempDir,
    }

    impl Harness {
        fn new() -> Self {
            let events = InMemoryEventSink::new();
            let notifier = Notifier::new(Arc::new(events.clone()), Arc::new(SystemClock));
            Self {
                store: InMemoryBytesClient::new(notifier),
                events,
                dir: tempfile::tempdir().unwrap(),
            }
        }

        fn write(&self, name: &str, contents: &[u8]) -> PathBuf {
            let path = self.dir.path().join(name);
            std::fs::write(&path, contents).unwrap();
            path
        }

        async fn run(&self, command: Command) -> Result<String, Box<dyn Error>> {
            let mut out = Vec::new();
            execute(command, &self.store, &self.events, &mut out).await?;
            Ok(String::from_utf8(out).unwrap())
        }
    }

    fn boefje_meta() -> BoefjeMeta {
        BoefjeMeta::new("task-1", Boefje::new("dns-records"), "acme")
    }

    #[tokio::test]
    async fn test_saved_boefje_meta_prints_as_stable_json() {
        let harness = Harness::new();
        let file = harness.write(
            "meta.json",
            &serde_json::to_vec(&boefje_meta()).unwrap(),
        );

        let saved = harness.run(Command::SaveBoefjeMeta { file }).await.unwrap();
        let printed = harness
            .run(Command::GetBoefjeMeta {
                id: "task-1".to_string(),
            })
            .await
            .unwrap();

        assert!(saved.is_empty());
        assert_eq!(printed, to_json_stable(&boefje_meta()).unwrap());
    }

    #[tokio::test]
    async fn test_save_raw_prints_event_with_guessed_mime_type() {
        let harness = Harness::new();
        harness.store.save_boefje_meta(&boefje_meta()).await.unwrap();
        let file = harness.write("page.html", b"<html></html>");

        let output = harness
            .run(Command::SaveRaw {
                id: "task-1".to_string(),
                file,
                mime_types: vec!["boefje/dns-records".to_string()],
                guess_mime_type: true,
            })
            .await
            .unwrap();

        assert!(output.contains(r#""event_type": "raw_data_received""#));
        assert!(output.contains("text/html"));
        assert!(output.contains("boefje/dns-records"));
        assert_eq!(harness.events.total_events().await, 0);
    }

    #[tokio::test]
    async fn test_get_raw_writes_output_file() {
        let harness = Harness::new();
        harness.store.save_boefje_meta(&boefje_meta()).await.unwrap();
        harness.store.save_raw("task-1", b"\x00\x01raw").await.unwrap();
        harness.events.drain("acme__raw_file_received").await;
        let output = harness.dir.path().join("raw.bin");

        let printed = harness
            .run(Command::GetRaw {
                id: "task-1".to_string(),
                output: Some(output.clone()),
            })
            .await
            .unwrap();

        assert!(printed.is_empty());
        assert_eq!(std::fs::read(output).unwrap(), b"\x00\x01raw".to_vec());
    }

    #[tokio::test]
    async fn test_save_normalizer_meta_prints_event() {
        let harness = Harness::new();
        let normalizer_meta =
            NormalizerMeta::new("norm-1", Normalizer::new("kat_dns_normalize"), boefje_meta());
        let file = harness.write(
            "normalizer.json",
            &serde_json::to_vec(&normalizer_meta).unwrap(),
        );

        let output = harness
            .run(Command::SaveNormalizerMeta { file })
            .await
            .unwrap();

        assert!(output.contains(r#""event_type": "normalizer_meta_received""#));
        assert!(output.contains(r#""organization": "acme""#));
    }

    #[tokio::test]
    async fn test_save_raw_for_unknown_owner_fails() {
        let harness = Harness::new();
        let file = harness.write("raw.txt", b"data");

        let result = harness
            .run(Command::SaveRaw {
                id: "ghost".to_string(),
                file,
                mime_types: Vec::new(),
                guess_mime_type: false,
            })
            .await;

        let error = result.unwrap_err();
        assert!(error.to_string().contains("ghost"));
    }
}
