//! Per-message flow: extract → look up → dispatch → summary.
//!
//! Every call to [`Pipeline::handle_text`] owns its identifiers, results and report;
//! nothing is shared with other messages except the read-only configuration.

use std::sync::Arc;

use crate::{
    batch::{BatchProcessor, BatchReport},
    catalog::{CatalogLookupClient, CatalogPort},
    config::{CatalogConfig, PipelineConfig},
    dispatch::{DispatchReport, ResponseDispatcher},
    domain::ChatId,
    identifiers::extract_identifiers,
    messaging::{port::MessagingPort, types::IncomingText},
};

pub const GREETING: &str = "Привет! Пришли один или много артикулов WB — я пришлю фото и итоговый отчёт.\n\
В группах и каналах бот отвечает только на сообщения с цифрами.";

pub const NO_IDENTIFIERS_PROMPT: &str = "Пришли артикулы WB 🙂";

pub fn truncation_notice(max_items: usize) -> String {
    format!("Обнаружено больше {max_items} артикулов, обработаю первые {max_items}.")
}

pub fn progress_notice(count: usize) -> String {
    format!("Нашёл {count} артикулов, ищу фото...")
}

/// How a message left the pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// No identifiers in a group/channel message: nothing was sent.
    Ignored,
    /// No identifiers in a private chat: the prompt was sent.
    Prompted,
    Completed {
        truncated: bool,
        report: BatchReport,
        dispatch: DispatchReport,
    },
}

#[derive(Clone)]
pub struct Pipeline {
    cfg: PipelineConfig,
    messenger: Arc<dyn MessagingPort>,
    batch: BatchProcessor,
    dispatcher: ResponseDispatcher,
}

impl Pipeline {
    pub fn new(
        cfg: PipelineConfig,
        catalog_cfg: &CatalogConfig,
        catalog: Arc<dyn CatalogPort>,
        messenger: Arc<dyn MessagingPort>,
    ) -> Self {
        let client = CatalogLookupClient::from_config(catalog, catalog_cfg);
        let batch = BatchProcessor::new(client, cfg.lookup_pacing);
        let dispatcher =
            ResponseDispatcher::new(messenger.clone(), cfg.album_chunk_size, cfg.album_pacing);
        Self {
            cfg,
            messenger,
            batch,
            dispatcher,
        }
    }

    pub async fn handle_text(&self, msg: IncomingText) -> PipelineOutcome {
        let chat_id = msg.chat_id;
        let extraction = extract_identifiers(&msg.text, self.cfg.max_items, self.cfg.dedup);

        if extraction.is_empty() {
            if !msg.chat_kind.is_private() {
                return PipelineOutcome::Ignored;
            }
            self.notify(chat_id, NO_IDENTIFIERS_PROMPT).await;
            return PipelineOutcome::Prompted;
        }

        if extraction.truncated {
            tracing::info!(
                chat_id = chat_id.0,
                extracted = extraction.raw_count,
                cap = self.cfg.max_items,
                "identifier list truncated"
            );
            self.notify(chat_id, &truncation_notice(self.cfg.max_items))
                .await;
        }

        let identifiers = extraction.identifiers;
        let total = identifiers.len();
        self.notify(chat_id, &progress_notice(total)).await;

        let (photos, report) = self.batch.process(&identifiers).await.into_report(total);
        let dispatch = self.dispatcher.dispatch(chat_id, &photos, &report).await;

        tracing::info!(
            chat_id = chat_id.0,
            total,
            found = report.found_count(),
            not_found = report.not_found_count(),
            failed_sends = dispatch.failed_sends(),
            "message processed"
        );

        PipelineOutcome::Completed {
            truncated: extraction.truncated,
            report,
            dispatch,
        }
    }

    /// Informational text; a failure here is logged and the flow goes on.
    async fn notify(&self, chat_id: ChatId, text: &str) {
        if let Err(e) = self.messenger.send_text(chat_id, text).await {
            tracing::warn!(chat_id = chat_id.0, error = %e, "failed to send notice");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::client::tests::{with_photo, FakeCatalog};
    use crate::domain::{ChatKind, Credential, Identifier};
    use crate::identifiers::DedupPolicy;
    use crate::messaging::testing::{FakeMessenger, Sent};
    use std::time::Duration;

    fn cfg(dedup: DedupPolicy) -> PipelineConfig {
        PipelineConfig {
            dedup,
            lookup_pacing: Duration::ZERO,
            album_pacing: Duration::ZERO,
            ..PipelineConfig::default()
        }
    }

    fn catalog_cfg() -> CatalogConfig {
        CatalogConfig {
            credentials: vec![Credential::new("a"), Credential::new("b")],
            ..CatalogConfig::default()
        }
    }

    fn msg(kind: ChatKind, text: &str) -> IncomingText {
        IncomingText {
            chat_id: ChatId(10),
            chat_kind: kind,
            text: text.to_string(),
        }
    }

    fn pipeline(
        dedup: DedupPolicy,
        catalog: FakeCatalog,
    ) -> (Pipeline, Arc<FakeCatalog>, Arc<FakeMessenger>) {
        let catalog = Arc::new(catalog);
        let messenger = Arc::new(FakeMessenger::new());
        let p = Pipeline::new(cfg(dedup), &catalog_cfg(), catalog.clone(), messenger.clone());
        (p, catalog, messenger)
    }

    #[tokio::test]
    async fn group_chat_without_digits_stays_silent() {
        let (p, catalog, messenger) = pipeline(DedupPolicy::default(), FakeCatalog::default());

        let out = p.handle_text(msg(ChatKind::Group, "hello everyone")).await;

        assert_eq!(out, PipelineOutcome::Ignored);
        assert!(messenger.calls().is_empty());
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn private_chat_without_digits_gets_one_prompt() {
        let (p, catalog, messenger) = pipeline(DedupPolicy::default(), FakeCatalog::default());

        let out = p.handle_text(msg(ChatKind::Private, "привет")).await;

        assert_eq!(out, PipelineOutcome::Prompted);
        assert_eq!(messenger.texts(), vec![NO_IDENTIFIERS_PROMPT.to_string()]);
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn dedup_scenario_sends_one_album_of_two() {
        let catalog = FakeCatalog::default()
            .answer("a", "12345", Ok(with_photo("https://p/12345")))
            .answer("a", "67890", Ok(with_photo("https://p/67890")));
        let (p, catalog, messenger) = pipeline(DedupPolicy::FirstOccurrence, catalog);

        let out = p
            .handle_text(msg(ChatKind::Private, "Артикул 12345 и еще 67890 67890"))
            .await;

        let PipelineOutcome::Completed { report, truncated, .. } = out else {
            panic!("expected completed outcome");
        };
        assert!(!truncated);
        assert_eq!(report.total, 2);
        assert_eq!(
            report.found,
            vec![Identifier::new("12345"), Identifier::new("67890")]
        );
        assert!(report.not_found.is_empty());
        assert_eq!(catalog.calls().len(), 2);

        let calls = messenger.calls();
        assert_eq!(calls[0], Sent::Text(progress_notice(2)));
        assert_eq!(
            calls[1],
            Sent::Album(vec![
                "https://p/12345".to_string(),
                "https://p/67890".to_string()
            ])
        );
        assert!(matches!(&calls[2], Sent::Text(t) if t.starts_with("Готово ✅")));
        assert_eq!(calls.len(), 3);
    }

    #[tokio::test]
    async fn keep_all_reports_duplicates_separately() {
        let catalog = FakeCatalog::default().answer("b", "777", Ok(with_photo("https://p/777")));
        let (p, catalog, messenger) = pipeline(DedupPolicy::KeepAll, catalog);

        let out = p.handle_text(msg(ChatKind::Group, "777 и 777, 888")).await;

        let PipelineOutcome::Completed { report, .. } = out else {
            panic!("expected completed outcome");
        };
        assert_eq!(report.total, 3);
        assert_eq!(report.found_count(), 2);
        assert_eq!(report.not_found, vec![Identifier::new("888")]);
        // Each 777 tries "a" first, then falls back to "b"; 888 exhausts both.
        assert_eq!(catalog.calls().len(), 6);
        assert_eq!(messenger.albums().len(), 1);
        assert!(messenger
            .texts()
            .last()
            .is_some_and(|t| t.contains("Нашлись: 777, 777")));
    }

    #[tokio::test]
    async fn over_cap_notifies_once_and_processes_first_hundred() {
        let (p, catalog, messenger) = pipeline(DedupPolicy::FirstOccurrence, FakeCatalog::default());
        let text = (1000..1150).map(|n| n.to_string()).collect::<Vec<_>>().join(" ");

        let out = p.handle_text(msg(ChatKind::Private, &text)).await;

        let PipelineOutcome::Completed { report, truncated, .. } = out else {
            panic!("expected completed outcome");
        };
        assert!(truncated);
        assert_eq!(report.total, 100);
        assert_eq!(report.not_found.len(), 100);
        assert_eq!(report.not_found[99], Identifier::new("1099"));

        let notices = messenger
            .texts()
            .into_iter()
            .filter(|t| *t == truncation_notice(100))
            .count();
        assert_eq!(notices, 1);

        let distinct: std::collections::HashSet<String> =
            catalog.calls().into_iter().map(|(_, id)| id).collect();
        assert_eq!(distinct.len(), 100);
    }

    #[tokio::test]
    async fn twenty_five_found_gives_three_albums_then_summary() {
        let mut catalog = FakeCatalog::default();
        for n in 1..=25 {
            let id = format!("{}", 500 + n);
            catalog = catalog.answer("a", &id, Ok(with_photo(&format!("https://p/{id}"))));
        }
        let (p, _, messenger) = pipeline(DedupPolicy::default(), catalog);
        let text = (501..=525).map(|n| n.to_string()).collect::<Vec<_>>().join(", ");

        p.handle_text(msg(ChatKind::Private, &text)).await;

        let sizes: Vec<usize> = messenger.albums().iter().map(|a| a.len()).collect();
        assert_eq!(sizes, vec![10, 10, 5]);
        let texts = messenger.texts();
        let summary = texts.last().cloned().unwrap_or_default();
        assert!(summary.contains("С фото: 25"));
        assert!(summary.contains("Без фото: 0"));
        assert!(!summary.contains("Не найдено"));
        assert!(matches!(messenger.calls().last(), Some(Sent::Text(_))));
    }

    #[tokio::test]
    async fn hundred_long_missing_identifiers_still_deliver_the_summary() {
        let (p, _, messenger) = pipeline(DedupPolicy::default(), FakeCatalog::default());
        let ids: Vec<String> = (0..100).map(|n| format!("{n:039}")).collect();

        let out = p.handle_text(msg(ChatKind::Private, &ids.join(" "))).await;

        let PipelineOutcome::Completed { report, dispatch, truncated } = out else {
            panic!("expected completed outcome");
        };
        assert!(!truncated);
        assert_eq!(report.not_found.len(), 100);
        assert_eq!(dispatch.summary, Some(crate::messaging::types::DeliveryOutcome::Sent));

        // Progress notice, then the summary in two parts.
        let texts = messenger.texts();
        assert_eq!(texts.len(), 3);
        assert!(texts.iter().all(|t| t.chars().count() <= 4096));
        assert!(texts[1].starts_with("Готово ✅"));
        let listed: Vec<&str> = texts[1..]
            .iter()
            .flat_map(|t| t.lines())
            .filter_map(|l| l.strip_prefix("Не найдено: "))
            .flat_map(|l| l.split(", "))
            .collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn failed_notices_do_not_abort_processing() {
        let catalog = Arc::new(FakeCatalog::default().answer("a", "1", Ok(with_photo("https://p/1"))));
        let messenger = Arc::new(FakeMessenger {
            fail_text: true,
            ..FakeMessenger::new()
        });
        let p = Pipeline::new(
            cfg(DedupPolicy::default()),
            &catalog_cfg(),
            catalog.clone(),
            messenger.clone(),
        );

        let out = p.handle_text(msg(ChatKind::Private, "1")).await;

        let PipelineOutcome::Completed { dispatch, .. } = out else {
            panic!("expected completed outcome");
        };
        assert_eq!(catalog.calls().len(), 1);
        assert!(dispatch.photo_sends[0].is_sent());
        assert!(matches!(dispatch.summary, Some(crate::messaging::types::DeliveryOutcome::Failed(_))));
    }
}
