//! # Migration Orchestrator
//!
//! Drives a full migration run: enumerates source containers, walks their
//! pages, pipes each item's bytes to the destination and registers the
//! resulting upload tokens, recording progress after every mutation so an
//! interrupted run resumes where it left off.
//!
//! ## Resume semantics
//!
//! The orchestrator is idempotent. Every durable fact (title, destination
//! id, expected counts, completed item ids) is written to the progress
//! store before the next network call, and items already recorded as done
//! are skipped without touching either service. A container whose record
//! says it is complete is skipped without a single source request.

use crate::config::MigrationConfig;
use crate::error::Result;
use crate::progress::{ContainerPhase, MigrationReport};
use core_ledger::{ContainerRecord, LedgerError, ProgressStore};
use migrate_traits::destination::{RegistrationClient, TransferClient};
use migrate_traits::error::TransportError;
use migrate_traits::model::{ContainerId, RegistrationRequest, SourceContainer, SourceItem};
use migrate_traits::source::SourceInventory;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Sequential migration pipeline over injected service seams.
pub struct Migrator {
    config: MigrationConfig,
    source: Arc<dyn SourceInventory>,
    transfer: Arc<dyn TransferClient>,
    registration: Arc<dyn RegistrationClient>,
    store: Arc<dyn ProgressStore>,
}

impl Migrator {
    pub fn new(
        config: MigrationConfig,
        source: Arc<dyn SourceInventory>,
        transfer: Arc<dyn TransferClient>,
        registration: Arc<dyn RegistrationClient>,
        store: Arc<dyn ProgressStore>,
    ) -> Self {
        Self {
            config,
            source,
            transfer,
            registration,
            store,
        }
    }

    /// Run a full migration pass over every source container.
    ///
    /// Containers are processed one at a time; a failure inside one
    /// container is recorded in the report and the run moves on. Only
    /// ledger write failures, a failed container listing, and
    /// authorization failures abort the run.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<MigrationReport> {
        let mut report = MigrationReport::default();

        let containers = self.source.list_containers().await?;
        info!(containers = containers.len(), "Source listing fetched");

        for container in &containers {
            self.migrate_container(&container.id, Some(container), &mut report)
                .await?;
        }

        if self.config.include_unfiled {
            self.migrate_container(&ContainerId::Unfiled, None, &mut report)
                .await?;
        }

        info!(
            containers_completed = report.containers_completed,
            containers_skipped = report.containers_skipped,
            containers_failed = report.containers_failed,
            items_migrated = report.items_migrated,
            items_failed = report.items_failed,
            "Migration run finished"
        );
        Ok(report)
    }

    /// Migrate one container, resuming from its progress record.
    #[instrument(skip(self, listing, report), fields(container = %id))]
    async fn migrate_container(
        &self,
        id: &ContainerId,
        listing: Option<&SourceContainer>,
        report: &mut MigrationReport,
    ) -> Result<()> {
        report.containers_visited += 1;

        let mut record = match self.store.load(id).await {
            Ok(Some(record)) => record,
            Ok(None) => ContainerRecord::new(id.clone()),
            Err(e @ LedgerError::Malformed { .. }) => {
                // A corrupt record is skipped rather than silently replaced,
                // so completed work is never re-uploaded by accident.
                error!(error = %e, "Progress record is unreadable, skipping container");
                report.containers_failed += 1;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        match listing {
            Some(container) => {
                record.set_title(&container.title);
                record.set_expected(container.photos, container.videos);
            }
            None => record.set_title(&self.config.unfiled_title),
        }
        self.store.save(&record).await?;

        if record.is_complete() {
            info!(
                completed = record.completed_total(),
                "Container already migrated, skipping"
            );
            report.containers_skipped += 1;
            return Ok(());
        }

        let failed = self.migrate_pages(id, &mut record, report).await?;

        if failed {
            report.containers_failed += 1;
        } else if record.is_complete() {
            info!(
                phase = %ContainerPhase::Done,
                completed = record.completed_total(),
                "Container migrated"
            );
            report.containers_completed += 1;
        }
        Ok(())
    }

    /// Walk the container's pages, migrating pending items.
    ///
    /// Returns `true` when the container hit an error that stops this run
    /// from finishing it; per-item failures do not.
    async fn migrate_pages(
        &self,
        id: &ContainerId,
        record: &mut ContainerRecord,
        report: &mut MigrationReport,
    ) -> Result<bool> {
        let mut page = 1u32;

        loop {
            debug!(phase = %ContainerPhase::Listing, page, "Fetching container page");
            let listing = match self.source.fetch_page(id, page).await {
                Ok(listing) => listing,
                Err(e @ TransportError::Unauthorized(_)) => return Err(e.into()),
                Err(e) => {
                    warn!(page, error = %e, "Failed to fetch container page");
                    return Ok(true);
                }
            };

            record.set_title(&listing.title);
            record.reconcile_expected_total(listing.total_items);
            self.store.save(record).await?;

            // Empty containers never get a destination created for them
            if record.is_complete() {
                return Ok(false);
            }

            if record.destination_id.is_none() {
                let title = record
                    .title
                    .clone()
                    .unwrap_or_else(|| id.to_string());
                info!(phase = %ContainerPhase::CreatingDestination, title, "Creating destination container");
                match self.registration.create_container(&title).await {
                    Ok(destination_id) => {
                        record.set_destination_id(&destination_id);
                        self.store.save(record).await?;
                    }
                    Err(e @ TransportError::Unauthorized(_)) => return Err(e.into()),
                    Err(e) => {
                        warn!(error = %e, "Failed to create destination container");
                        return Ok(true);
                    }
                }
            }

            let Some(destination_id) = record.destination_id.clone() else {
                return Ok(true);
            };

            for item in &listing.items {
                if record.is_done(&item.id) {
                    debug!(item = %item.id, "Item already migrated, skipping");
                    report.items_skipped += 1;
                    continue;
                }
                if self.migrate_item(&destination_id, item, record).await? {
                    report.items_migrated += 1;
                } else {
                    report.items_failed += 1;
                }
            }

            if page >= listing.total_pages {
                return Ok(false);
            }
            page += 1;
        }
    }

    /// Transfer and register a single item.
    ///
    /// Returns `Ok(true)` only once the item is registered and its id is
    /// durably recorded. A service failure leaves the item pending for the
    /// next run, except an authorization failure: no later call can
    /// succeed with a dead credential, so it aborts the run.
    #[instrument(skip(self, record), fields(item = %item.id, kind = %item.kind))]
    async fn migrate_item(
        &self,
        destination_id: &str,
        item: &SourceItem,
        record: &mut ContainerRecord,
    ) -> Result<bool> {
        debug!(phase = %ContainerPhase::Transferring, filename = %item.filename, "Transferring item bytes");
        let upload_token = match self
            .transfer
            .transfer(&item.download_url, &item.filename)
            .await
        {
            Ok(token) => token,
            Err(e @ TransportError::Unauthorized(_)) => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "Transfer failed, item stays pending");
                return Ok(false);
            }
        };

        let description = if item.title.is_empty() {
            debug!("Item has no title, using placeholder description");
            "(no description)".to_string()
        } else {
            item.title.clone()
        };

        let request = RegistrationRequest {
            description,
            upload_token,
        };

        debug!(phase = %ContainerPhase::Registering, "Registering upload");
        let outcomes = match self
            .registration
            .register(destination_id, std::slice::from_ref(&request))
            .await
        {
            Ok(outcomes) => outcomes,
            Err(e @ TransportError::Unauthorized(_)) => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "Registration call failed, item stays pending");
                return Ok(false);
            }
        };

        let Some(outcome) = outcomes.first() else {
            warn!("Registration returned no outcome, item stays pending");
            return Ok(false);
        };

        if !outcome.ok {
            warn!(
                error = outcome.error.as_deref().unwrap_or("unknown"),
                "Item registration rejected, item stays pending"
            );
            return Ok(false);
        }

        record.mark_done(&item.id, item.kind);
        self.store.save(record).await?;

        info!(media_id = outcome.media_id.as_deref().unwrap_or(""), "Item migrated");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use core_ledger::Result as LedgerResult;
    use migrate_traits::error::Result as TransportResult;
    use migrate_traits::error::TransportError;
    use migrate_traits::model::{
        ContainerPage, MediaKind, RegistrationOutcome, UploadToken,
    };
    use mockall::mock;
    use mockall::predicate::eq;
    use std::collections::HashMap;
    use std::sync::Mutex;

    mock! {
        Source {}

        #[async_trait]
        impl SourceInventory for Source {
            async fn list_containers(&self) -> TransportResult<Vec<SourceContainer>>;
            async fn fetch_page(&self, id: &ContainerId, page: u32) -> TransportResult<ContainerPage>;
        }
    }

    mock! {
        Transfer {}

        #[async_trait]
        impl TransferClient for Transfer {
            async fn transfer(&self, url: &str, filename: &str) -> TransportResult<UploadToken>;
        }
    }

    mock! {
        Registration {}

        #[async_trait]
        impl RegistrationClient for Registration {
            async fn create_container(&self, title: &str) -> TransportResult<String>;
            async fn register(
                &self,
                destination_id: &str,
                items: &[RegistrationRequest],
            ) -> TransportResult<Vec<RegistrationOutcome>>;
        }
    }

    /// In-memory progress store keyed by ledger file name.
    #[derive(Default)]
    struct MemoryStore {
        records: Mutex<HashMap<String, ContainerRecord>>,
    }

    impl MemoryStore {
        fn with_record(record: ContainerRecord) -> Self {
            let store = Self::default();
            store.records.lock().unwrap().insert(
                record.container_id.ledger_file_name(),
                record,
            );
            store
        }

        fn get(&self, id: &ContainerId) -> Option<ContainerRecord> {
            self.records
                .lock()
                .unwrap()
                .get(&id.ledger_file_name())
                .cloned()
        }
    }

    #[async_trait]
    impl ProgressStore for MemoryStore {
        async fn load(&self, id: &ContainerId) -> LedgerResult<Option<ContainerRecord>> {
            Ok(self.get(id))
        }

        async fn save(&self, record: &ContainerRecord) -> LedgerResult<()> {
            self.records.lock().unwrap().insert(
                record.container_id.ledger_file_name(),
                record.clone(),
            );
            Ok(())
        }

        async fn exists(&self, id: &ContainerId) -> bool {
            self.get(id).is_some()
        }
    }

    /// Store whose records always fail to parse.
    struct MalformedStore;

    #[async_trait]
    impl ProgressStore for MalformedStore {
        async fn load(&self, id: &ContainerId) -> LedgerResult<Option<ContainerRecord>> {
            Err(LedgerError::Malformed {
                container: id.to_string(),
                reason: "expected value at line 1".to_string(),
            })
        }

        async fn save(&self, _record: &ContainerRecord) -> LedgerResult<()> {
            Ok(())
        }

        async fn exists(&self, _id: &ContainerId) -> bool {
            true
        }
    }

    fn config(include_unfiled: bool) -> MigrationConfig {
        MigrationConfig::builder()
            .ledger_dir("albums")
            .include_unfiled(include_unfiled)
            .build()
            .unwrap()
    }

    fn photo(id: &str, title: &str) -> SourceItem {
        SourceItem {
            id: id.to_string(),
            kind: MediaKind::Photo,
            title: title.to_string(),
            download_url: format!("https://live.example.com/{}_o.jpg", id),
            filename: format!("flickr_{}.jpg", id),
        }
    }

    fn page(items: Vec<SourceItem>, page: u32, total_pages: u32, title: &str) -> ContainerPage {
        let total_items = items.len() as u64;
        ContainerPage {
            items,
            page,
            total_pages,
            total_items,
            title: title.to_string(),
        }
    }

    fn ok_outcome(media_id: &str) -> RegistrationOutcome {
        RegistrationOutcome {
            ok: true,
            media_id: Some(media_id.to_string()),
            error: None,
        }
    }

    fn album_listing() -> Vec<SourceContainer> {
        vec![SourceContainer {
            id: ContainerId::Named("42".to_string()),
            title: "Holiday 2014".to_string(),
            photos: 2,
            videos: 0,
        }]
    }

    fn migrator(
        include_unfiled: bool,
        source: MockSource,
        transfer: MockTransfer,
        registration: MockRegistration,
        store: Arc<dyn ProgressStore>,
    ) -> Migrator {
        Migrator::new(
            config(include_unfiled),
            Arc::new(source),
            Arc::new(transfer),
            Arc::new(registration),
            store,
        )
    }

    #[tokio::test]
    async fn test_first_run_migrates_every_item() {
        let mut source = MockSource::new();
        source
            .expect_list_containers()
            .times(1)
            .returning(|| Ok(album_listing()));
        source
            .expect_fetch_page()
            .with(eq(ContainerId::Named("42".to_string())), eq(1))
            .times(1)
            .returning(|_, _| {
                Ok(page(
                    vec![photo("p1", "Sunset"), photo("p2", "")],
                    1,
                    1,
                    "Holiday 2014",
                ))
            });

        let mut transfer = MockTransfer::new();
        transfer
            .expect_transfer()
            .times(2)
            .returning(|_, filename| Ok(UploadToken::new(format!("token-{}", filename))));

        let mut registration = MockRegistration::new();
        registration
            .expect_create_container()
            .with(eq("Holiday 2014"))
            .times(1)
            .returning(|_| Ok("dest-1".to_string()));
        registration
            .expect_register()
            .times(2)
            .returning(|_, items| {
                assert_eq!(items.len(), 1);
                Ok(vec![ok_outcome("media-1")])
            });

        let store = Arc::new(MemoryStore::default());
        let migrator = migrator(false, source, transfer, registration, store.clone());

        let report = migrator.run().await.unwrap();
        assert_eq!(report.containers_visited, 1);
        assert_eq!(report.containers_completed, 1);
        assert_eq!(report.items_migrated, 2);
        assert!(report.is_clean());

        let record = store.get(&ContainerId::Named("42".to_string())).unwrap();
        assert!(record.is_complete());
        assert_eq!(record.destination_id, Some("dest-1".to_string()));
        assert!(record.is_done("p1"));
        assert!(record.is_done("p2"));
    }

    #[tokio::test]
    async fn test_resume_skips_completed_items() {
        let id = ContainerId::Named("42".to_string());
        let mut record = ContainerRecord::new(id.clone());
        record.set_title("Holiday 2014");
        record.set_destination_id("dest-1");
        record.set_expected(2, 0);
        record.mark_done("p1", MediaKind::Photo);

        let mut source = MockSource::new();
        source
            .expect_list_containers()
            .returning(|| Ok(album_listing()));
        source.expect_fetch_page().times(1).returning(|_, _| {
            Ok(page(
                vec![photo("p1", "Sunset"), photo("p2", "Beach")],
                1,
                1,
                "Holiday 2014",
            ))
        });

        let mut transfer = MockTransfer::new();
        transfer
            .expect_transfer()
            .withf(|url, _| url.contains("p2"))
            .times(1)
            .returning(|_, _| Ok(UploadToken::new("token-p2")));

        let mut registration = MockRegistration::new();
        registration.expect_create_container().times(0);
        registration
            .expect_register()
            .with(eq("dest-1"), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Ok(vec![ok_outcome("media-2")]));

        let store = Arc::new(MemoryStore::with_record(record));
        let migrator = migrator(false, source, transfer, registration, store.clone());

        let report = migrator.run().await.unwrap();
        assert_eq!(report.items_skipped, 1);
        assert_eq!(report.items_migrated, 1);
        assert_eq!(report.containers_completed, 1);

        let record = store.get(&id).unwrap();
        assert!(record.is_complete());
    }

    #[tokio::test]
    async fn test_complete_container_short_circuits() {
        let id = ContainerId::Named("42".to_string());
        let mut record = ContainerRecord::new(id.clone());
        record.set_expected(1, 0);
        record.mark_done("p1", MediaKind::Photo);

        let mut source = MockSource::new();
        source
            .expect_list_containers()
            .returning(|| {
                Ok(vec![SourceContainer {
                    id: ContainerId::Named("42".to_string()),
                    title: "Holiday 2014".to_string(),
                    photos: 1,
                    videos: 0,
                }])
            });
        source.expect_fetch_page().times(0);

        let store = Arc::new(MemoryStore::with_record(record));
        let migrator = migrator(
            false,
            source,
            MockTransfer::new(),
            MockRegistration::new(),
            store,
        );

        let report = migrator.run().await.unwrap();
        assert_eq!(report.containers_skipped, 1);
        assert_eq!(report.containers_completed, 0);
    }

    #[tokio::test]
    async fn test_rejected_registration_leaves_item_pending() {
        let mut source = MockSource::new();
        source
            .expect_list_containers()
            .returning(|| Ok(album_listing()));
        source
            .expect_fetch_page()
            .times(1)
            .returning(|_, _| Ok(page(vec![photo("p1", "Sunset")], 1, 1, "Holiday 2014")));

        let mut transfer = MockTransfer::new();
        transfer
            .expect_transfer()
            .times(1)
            .returning(|_, _| Ok(UploadToken::new("token-p1")));

        let mut registration = MockRegistration::new();
        registration
            .expect_create_container()
            .returning(|_| Ok("dest-1".to_string()));
        registration.expect_register().times(1).returning(|_, _| {
            Ok(vec![RegistrationOutcome {
                ok: false,
                media_id: None,
                error: Some("Invalid upload token".to_string()),
            }])
        });

        let store = Arc::new(MemoryStore::default());
        let migrator = migrator(false, source, transfer, registration, store.clone());

        let report = migrator.run().await.unwrap();
        assert_eq!(report.items_failed, 1);
        assert_eq!(report.items_migrated, 0);
        assert_eq!(report.containers_completed, 0);

        let record = store.get(&ContainerId::Named("42".to_string())).unwrap();
        assert!(!record.is_done("p1"));
    }

    #[tokio::test]
    async fn test_credential_failure_aborts_run() {
        let mut source = MockSource::new();
        source.expect_list_containers().returning(|| {
            Ok(vec![
                SourceContainer {
                    id: ContainerId::Named("42".to_string()),
                    title: "Holiday 2014".to_string(),
                    photos: 2,
                    videos: 0,
                },
                SourceContainer {
                    id: ContainerId::Named("43".to_string()),
                    title: "Holiday 2015".to_string(),
                    photos: 2,
                    videos: 0,
                },
            ])
        });
        // Only the first container's first page is ever fetched
        source.expect_fetch_page().times(1).returning(|_, _| {
            Ok(page(
                vec![photo("p1", "Sunset"), photo("p2", "Beach")],
                1,
                1,
                "Holiday 2014",
            ))
        });

        let mut transfer = MockTransfer::new();
        transfer.expect_transfer().times(1).returning(|_, _| {
            Err(TransportError::Unauthorized(
                "Token refresh failed: invalid_grant".to_string(),
            ))
        });

        let mut registration = MockRegistration::new();
        registration
            .expect_create_container()
            .returning(|_| Ok("dest-1".to_string()));
        registration.expect_register().times(0);

        let store = Arc::new(MemoryStore::default());
        let migrator = migrator(false, source, transfer, registration, store.clone());

        let result = migrator.run().await;
        assert!(matches!(
            result.unwrap_err(),
            crate::error::MigrateError::Transport(TransportError::Unauthorized(_))
        ));

        // Nothing was recorded as done
        let record = store.get(&ContainerId::Named("42".to_string())).unwrap();
        assert_eq!(record.completed_total(), 0);
    }

    #[tokio::test]
    async fn test_registration_transport_failure_leaves_ledger_unchanged() {
        let mut source = MockSource::new();
        source
            .expect_list_containers()
            .returning(|| Ok(album_listing()));
        source.expect_fetch_page().times(1).returning(|_, _| {
            Ok(page(
                vec![photo("p1", "Sunset"), photo("p2", "Beach")],
                1,
                1,
                "Holiday 2014",
            ))
        });

        let mut transfer = MockTransfer::new();
        transfer
            .expect_transfer()
            .times(2)
            .returning(|_, _| Ok(UploadToken::new("token")));

        let mut registration = MockRegistration::new();
        registration
            .expect_create_container()
            .returning(|_| Ok("dest-1".to_string()));
        let mut call = 0;
        registration.expect_register().times(2).returning(move |_, _| {
            call += 1;
            if call == 1 {
                Err(TransportError::Http {
                    status: 500,
                    message: "Internal error".to_string(),
                })
            } else {
                Ok(vec![ok_outcome("media-2")])
            }
        });

        let store = Arc::new(MemoryStore::default());
        let migrator = migrator(false, source, transfer, registration, store.clone());

        // The failed call affects only its own item; the run moves on.
        let report = migrator.run().await.unwrap();
        assert_eq!(report.items_failed, 1);
        assert_eq!(report.items_migrated, 1);

        let record = store.get(&ContainerId::Named("42".to_string())).unwrap();
        assert!(!record.is_done("p1"));
        assert!(record.is_done("p2"));
    }

    #[tokio::test]
    async fn test_transfer_error_skips_registration() {
        let mut source = MockSource::new();
        source
            .expect_list_containers()
            .returning(|| Ok(album_listing()));
        source
            .expect_fetch_page()
            .times(1)
            .returning(|_, _| Ok(page(vec![photo("p1", "Sunset")], 1, 1, "Holiday 2014")));

        let mut transfer = MockTransfer::new();
        transfer.expect_transfer().times(1).returning(|_, _| {
            Err(TransportError::Network("connection reset".to_string()))
        });

        let mut registration = MockRegistration::new();
        registration
            .expect_create_container()
            .returning(|_| Ok("dest-1".to_string()));
        registration.expect_register().times(0);

        let store = Arc::new(MemoryStore::default());
        let migrator = migrator(false, source, transfer, registration, store);

        let report = migrator.run().await.unwrap();
        assert_eq!(report.items_failed, 1);
        assert!(!report.is_clean());
    }

    #[tokio::test]
    async fn test_unfiled_items_migrated_when_enabled() {
        let mut source = MockSource::new();
        source.expect_list_containers().returning(|| Ok(vec![]));
        source
            .expect_fetch_page()
            .with(eq(ContainerId::Unfiled), eq(1))
            .times(1)
            .returning(|_, _| Ok(page(vec![photo("p9", "Loose")], 1, 1, "Not in a set")));

        let mut transfer = MockTransfer::new();
        transfer
            .expect_transfer()
            .times(1)
            .returning(|_, _| Ok(UploadToken::new("token-p9")));

        let mut registration = MockRegistration::new();
        registration
            .expect_create_container()
            .with(eq("Not in a set"))
            .times(1)
            .returning(|_| Ok("dest-unfiled".to_string()));
        registration
            .expect_register()
            .times(1)
            .returning(|_, _| Ok(vec![ok_outcome("media-9")]));

        let store = Arc::new(MemoryStore::default());
        let migrator = migrator(true, source, transfer, registration, store.clone());

        let report = migrator.run().await.unwrap();
        assert_eq!(report.containers_visited, 1);
        assert_eq!(report.containers_completed, 1);

        let record = store.get(&ContainerId::Unfiled).unwrap();
        assert!(record.is_done("p9"));
    }

    #[tokio::test]
    async fn test_unfiled_title_override_wins_over_page_title() {
        let mut source = MockSource::new();
        source.expect_list_containers().returning(|| Ok(vec![]));
        source
            .expect_fetch_page()
            .times(1)
            .returning(|_, _| Ok(page(vec![photo("p9", "Loose")], 1, 1, "Not in a set")));

        let mut transfer = MockTransfer::new();
        transfer
            .expect_transfer()
            .times(1)
            .returning(|_, _| Ok(UploadToken::new("token-p9")));

        let mut registration = MockRegistration::new();
        registration
            .expect_create_container()
            .with(eq("Loose photos"))
            .times(1)
            .returning(|_| Ok("dest-unfiled".to_string()));
        registration
            .expect_register()
            .times(1)
            .returning(|_, _| Ok(vec![ok_outcome("media-9")]));

        let config = MigrationConfig::builder()
            .ledger_dir("albums")
            .include_unfiled(true)
            .unfiled_title("Loose photos")
            .build()
            .unwrap();

        let store = Arc::new(MemoryStore::default());
        let migrator = Migrator::new(
            config,
            Arc::new(source),
            Arc::new(transfer),
            Arc::new(registration),
            store.clone(),
        );

        migrator.run().await.unwrap();

        let record = store.get(&ContainerId::Unfiled).unwrap();
        assert_eq!(record.title, Some("Loose photos".to_string()));
    }

    #[tokio::test]
    async fn test_empty_unfiled_creates_no_destination() {
        let mut source = MockSource::new();
        source.expect_list_containers().returning(|| Ok(vec![]));
        source
            .expect_fetch_page()
            .times(1)
            .returning(|_, _| Ok(page(vec![], 1, 0, "Not in a set")));

        let mut registration = MockRegistration::new();
        registration.expect_create_container().times(0);
        registration.expect_register().times(0);

        let store = Arc::new(MemoryStore::default());
        let migrator = migrator(true, source, MockTransfer::new(), registration, store.clone());

        let report = migrator.run().await.unwrap();
        assert_eq!(report.containers_completed, 1);
        assert_eq!(report.items_migrated, 0);

        let record = store.get(&ContainerId::Unfiled).unwrap();
        assert!(record.is_complete());
        assert!(record.destination_id.is_none());
    }

    #[tokio::test]
    async fn test_malformed_record_fails_container_without_fetching() {
        let mut source = MockSource::new();
        source
            .expect_list_containers()
            .returning(|| Ok(album_listing()));
        source.expect_fetch_page().times(0);

        let migrator = migrator(
            false,
            source,
            MockTransfer::new(),
            MockRegistration::new(),
            Arc::new(MalformedStore),
        );

        let report = migrator.run().await.unwrap();
        assert_eq!(report.containers_failed, 1);
        assert_eq!(report.containers_completed, 0);
    }

    #[tokio::test]
    async fn test_page_fetch_error_fails_container() {
        let mut source = MockSource::new();
        source
            .expect_list_containers()
            .returning(|| Ok(album_listing()));
        source.expect_fetch_page().times(1).returning(|_, _| {
            Err(TransportError::Http {
                status: 503,
                message: "Service Unavailable".to_string(),
            })
        });

        let store = Arc::new(MemoryStore::default());
        let migrator = migrator(
            false,
            source,
            MockTransfer::new(),
            MockRegistration::new(),
            store,
        );

        let report = migrator.run().await.unwrap();
        assert_eq!(report.containers_failed, 1);
        assert!(!report.is_clean());
    }

    #[tokio::test]
    async fn test_multiple_pages_are_walked() {
        let mut source = MockSource::new();
        source
            .expect_list_containers()
            .returning(|| {
                Ok(vec![SourceContainer {
                    id: ContainerId::Named("42".to_string()),
                    title: "Holiday 2014".to_string(),
                    photos: 2,
                    videos: 0,
                }])
            });
        source
            .expect_fetch_page()
            .with(eq(ContainerId::Named("42".to_string())), eq(1))
            .times(1)
            .returning(|_, _| {
                let mut p = page(vec![photo("p1", "Sunset")], 1, 2, "Holiday 2014");
                p.total_items = 2;
                Ok(p)
            });
        source
            .expect_fetch_page()
            .with(eq(ContainerId::Named("42".to_string())), eq(2))
            .times(1)
            .returning(|_, _| {
                let mut p = page(vec![photo("p2", "Beach")], 2, 2, "Holiday 2014");
                p.total_items = 2;
                Ok(p)
            });

        let mut transfer = MockTransfer::new();
        transfer
            .expect_transfer()
            .times(2)
            .returning(|_, _| Ok(UploadToken::new("token")));

        let mut registration = MockRegistration::new();
        registration
            .expect_create_container()
            .times(1)
            .returning(|_| Ok("dest-1".to_string()));
        registration
            .expect_register()
            .times(2)
            .returning(|_, _| Ok(vec![ok_outcome("media")]));

        let store = Arc::new(MemoryStore::default());
        let migrator = migrator(false, source, transfer, registration, store.clone());

        let report = migrator.run().await.unwrap();
        assert_eq!(report.items_migrated, 2);
        assert_eq!(report.containers_completed, 1);
    }
}
