use anyhow::{bail, Context, Result};
use sqlx::{PgPool, Postgres, Transaction};

use crate::repos::category::CategoryRepository;
use crate::repos::generic::Repository;
use crate::repos::product::ProductRepository;

/// One transactional scope aggregating the catalog repositories.
///
/// Every repository handed out by a unit of work runs on the same open
/// transaction, so staged changes across entity types land (or don't)
/// atomically at `commit`. A unit of work spans exactly one logical
/// request: open it, stage, commit, drop. Dropping without committing
/// rolls every staged change back, which is also how an aborted
/// request is discarded.
pub struct UnitOfWork {
    tx: Transaction<'static, Postgres>,
    staged: u64,
    misses: Vec<String>,
}

impl UnitOfWork {
    pub async fn begin(pool: &PgPool) -> Result<Self> {
        let tx = pool
            .begin()
            .await
            .context("Failed to open transaction")?;
        Ok(Self {
            tx,
            staged: 0,
            misses: Vec::new(),
        })
    }

    /// Category repository bound to this transaction.
    pub fn categories(&mut self) -> CategoryRepository<'_> {
        CategoryRepository::new(Repository::new(
            &mut self.tx,
            &mut self.staged,
            &mut self.misses,
        ))
    }

    /// Product repository bound to this transaction.
    pub fn products(&mut self) -> ProductRepository<'_> {
        ProductRepository::new(Repository::new(
            &mut self.tx,
            &mut self.staged,
            &mut self.misses,
        ))
    }

    /// The raw transaction connection, for read paths that compose
    /// queries directly.
    pub fn connection(&mut self) -> &mut sqlx::PgConnection {
        &mut self.tx
    }

    /// Flush every staged change atomically and return the number of
    /// affected rows. Constraint violations surface here (or earlier,
    /// when a change was staged) and propagate unmodified. An update
    /// staged against an identity that matched no row also errors
    /// here: nothing is committed and the miss is reported as a
    /// store-level failure.
    pub async fn commit(self) -> Result<u64> {
        let UnitOfWork {
            tx,
            staged,
            mut misses,
        } = self;
        if !misses.is_empty() {
            let miss = misses.remove(0);
            tx.rollback()
                .await
                .context("Failed to roll back unit of work")?;
            bail!("update matched no row: {}", miss);
        }
        tx.commit().await.context("Failed to commit unit of work")?;
        Ok(staged)
    }

    /// Discard every staged change. Dropping the unit of work has the
    /// same effect; this just makes the intent explicit.
    pub async fn rollback(self) -> Result<()> {
        self.tx
            .rollback()
            .await
            .context("Failed to roll back unit of work")?;
        Ok(())
    }
}
