// src/pipeline.rs
//! Pipeline controller: drives one artifact through its stages
//!
//! ```text
//! created ──pack──▶ zipped ──seal──▶ encrypted ──open──▶ decrypted ──unpack──▶ extracted
//!    └──────────────┴──────────────────┴──────────────────┴──▶ error
//! ```
//!
//! Each transition finishes its disk side effect before the ledger update
//! is committed. After a crash the committed status says which single
//! transition to re-attempt. Any failure is written to the ledger as
//! `error` before it propagates; nothing is retried automatically.

use tracing::{error, info, instrument};

use crate::archive;
use crate::artifact::Artifact;
use crate::crypto;
use crate::db::{Ledger, LifecycleRecord, NewRecord};
use crate::enums::Status;
use crate::error::{CoreError, Result};
use crate::file_ops::{file_size, read_stage_file, remove_files, write_atomic};
use crate::key_ops::KeyProvider;
use crate::naming::{base_name_of, unique_name, unique_name_with_suffix, Stage, StageLayout};
use crate::util::{human_size, now_rfc3339};

/// Outcome of driving one record to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub id: i64,
    pub unique_name: String,
    pub status: Status,
    pub final_filename: Option<String>,
    pub zip_file_size: Option<String>,
    pub crypt_file_size: Option<String>,
    pub original_file_size: Option<String>,
}

impl From<LifecycleRecord> for RunReport {
    fn from(record: LifecycleRecord) -> Self {
        Self {
            id: record.id,
            unique_name: record.unique_filename,
            status: record.status,
            final_filename: record.final_filename,
            zip_file_size: record.zip_file_size,
            crypt_file_size: record.crypt_file_size,
            original_file_size: record.original_file_size,
        }
    }
}

pub struct Pipeline<L: Ledger, K: KeyProvider> {
    layout: StageLayout,
    ledger: L,
    keys: K,
    random_suffix: bool,
}

impl<L: Ledger, K: KeyProvider> Pipeline<L, K> {
    pub fn new(layout: StageLayout, ledger: L, keys: K) -> Self {
        Self {
            layout,
            ledger,
            keys,
            random_suffix: false,
        }
    }

    /// Append a random suffix to unique names so same-second enqueues never collide
    pub fn with_random_suffix(mut self, enabled: bool) -> Self {
        self.random_suffix = enabled;
        self
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// Record a new unit of work for `queries/<base>.sql`.
    ///
    /// The unique name is assigned here, once, and stored in the ledger.
    pub fn enqueue(
        &mut self,
        sql_file_name: &str,
        uploader_id: Option<i64>,
    ) -> Result<(i64, Artifact)> {
        let base = base_name_of(sql_file_name)?;
        let unique = if self.random_suffix {
            unique_name_with_suffix(&base)
        } else {
            unique_name(&base)
        };
        let artifact = Artifact::new(&base, &unique);

        let source = self.layout.stage_path(Stage::Queries, &artifact.sql_file_name);
        if !source.is_file() {
            return Err(CoreError::NotFound(source));
        }

        let id = self.ledger.create(&NewRecord {
            uploader_id,
            unique_filename: artifact.unique_name.clone(),
            crypt_filename: artifact.crypt_file_name.clone(),
            zip_filename: artifact.zip_file_name.clone(),
            crypt_file_size: None,
        })?;
        Ok((id, artifact))
    }

    /// Pick up interrupted work first, then the oldest pending record
    pub fn process_next(&mut self) -> Result<Option<RunReport>> {
        let next = match self.ledger.find_next_interrupted()? {
            Some(record) => {
                info!(id = record.id, status = %record.status, "resuming interrupted record");
                Some(record)
            }
            None => self.ledger.find_next_pending()?,
        };

        match next {
            Some(record) => self.run(record.id).map(Some),
            None => Ok(None),
        }
    }

    /// Drive record `id` from its committed status to `extracted`
    #[instrument(skip(self))]
    pub fn run(&mut self, id: i64) -> Result<RunReport> {
        let record = self.ledger.get(id)?;
        let artifact = match Artifact::from_record(&record) {
            Ok(artifact) => artifact,
            Err(e) => return Err(self.fail(id, e)),
        };

        let mut status = record.status;
        while !status.is_terminal() {
            status = match self.step(id, &artifact, status) {
                Ok(next) => next,
                Err(e) => return Err(self.fail(id, e)),
            };
        }

        let report = RunReport::from(self.ledger.get(id)?);
        info!(id, status = %report.status, "pipeline run finished");
        Ok(report)
    }

    /// Perform exactly one transition out of `status`; returns the new status
    pub fn step(&mut self, id: i64, artifact: &Artifact, status: Status) -> Result<Status> {
        match status {
            Status::Created => self.zip_stage(id, artifact)?,
            Status::Zipped => self.seal_stage(id, artifact)?,
            Status::Encrypted => self.open_stage(id, artifact)?,
            Status::Decrypted => self.extract_stage(id, artifact)?,
            Status::Extracted | Status::Error => return Ok(status),
        }
        let next = status.next().unwrap_or(status);
        info!(id, from = %status, to = %next, "transition committed");
        Ok(next)
    }

    /// queries/<base>.sql → raw/<unique>.zip
    fn zip_stage(&mut self, id: i64, artifact: &Artifact) -> Result<()> {
        let source = self.layout.stage_path(Stage::Queries, &artifact.sql_file_name);
        let dest = self.layout.stage_path(Stage::Raw, &artifact.zip_file_name);
        archive::pack(&source, &dest)?;
        self.ledger.mark_zipped(id, &now_rfc3339())
    }

    /// raw/<unique>.zip → raw/<base>.crypt
    fn seal_stage(&mut self, id: i64, artifact: &Artifact) -> Result<()> {
        let zipped = read_stage_file(self.layout.stage_path(Stage::Raw, &artifact.zip_file_name))?;
        let sealed = crypto::seal(&zipped, self.keys.seal_key()?)?;
        let written = write_atomic(
            self.layout.stage_path(Stage::Raw, &artifact.crypt_file_name),
            &sealed,
        )?;
        self.ledger
            .mark_encrypted(id, &human_size(written), &now_rfc3339())
    }

    /// raw/<base>.crypt → staging/<unique>.zip
    fn open_stage(&mut self, id: i64, artifact: &Artifact) -> Result<()> {
        let sealed = read_stage_file(self.layout.stage_path(Stage::Raw, &artifact.crypt_file_name))?;
        let plaintext = crypto::open(&sealed, self.keys.seal_key()?)?;
        let written = write_atomic(
            self.layout.stage_path(Stage::Staging, &artifact.zip_file_name),
            plaintext.expose_secret(),
        )?;
        self.ledger
            .mark_decrypted(id, &human_size(written), &now_rfc3339())
    }

    /// staging/<unique>.zip → clean/<entry>, then clear raw and staging.
    ///
    /// The staging zip is removed last. If it is already gone, an earlier
    /// attempt unpacked and started cleanup before the ledger commit, so the
    /// output already in `clean/` is taken as the result.
    fn extract_stage(&mut self, id: i64, artifact: &Artifact) -> Result<()> {
        let staged = self.layout.stage_path(Stage::Staging, &artifact.zip_file_name);
        let (final_name, final_path) = if staged.is_file() {
            archive::unpack(&staged, self.layout.dir(Stage::Clean))?
        } else {
            let extracted = self.layout.stage_path(Stage::Clean, &artifact.sql_file_name);
            if !extracted.is_file() {
                return Err(CoreError::NotFound(staged));
            }
            info!(id, final_filename = %artifact.sql_file_name, "finishing interrupted extraction");
            (artifact.sql_file_name.clone(), extracted)
        };
        let original_size = file_size(&final_path)?;

        remove_files(&[
            self.layout.stage_path(Stage::Raw, &artifact.zip_file_name),
            self.layout.stage_path(Stage::Raw, &artifact.crypt_file_name),
            staged,
        ])?;

        self.ledger.mark_extracted(
            id,
            &human_size(original_size),
            &final_name,
            &now_rfc3339(),
        )
    }

    /// Record `error` for `id`, then hand the original error back.
    ///
    /// If the ledger refuses the update the record is still resumable, so
    /// the caller gets [`CoreError::ErrorNotRecorded`] and must stop polling.
    fn fail(&mut self, id: i64, err: CoreError) -> CoreError {
        error!(id, error = %err, "artifact processing aborted");
        match self.ledger.mark_error(id, &err.to_string()) {
            Ok(()) => err,
            Err(ledger_err) => {
                error!(id, error = %ledger_err, "could not record error status");
                CoreError::ErrorNotRecorded {
                    id,
                    cause: Box::new(err),
                    ledger: Box::new(ledger_err),
                }
            }
        }
    }
}
