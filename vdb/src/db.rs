use tracing::instrument;

use crate::{
    catalog::registry::Catalog,
    error::DbResult,
    exec::{
        query::{ExecCtx, Operator},
        tuple::Tuple,
    },
};

/// The database handle: the catalog plus plan execution.
#[derive(Default)]
pub struct Db {
    catalog: Catalog,
}

impl Db {
    /// Creates a new database with an empty catalog.
    pub fn new() -> Db {
        Db::default()
    }

    /// Returns the database catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Runs the given plan to completion, feeding every produced tuple
    /// to `f`.
    ///
    /// The plan is closed before returning, even if the callback bails
    /// out early. A callback error stops the run and is returned in
    /// the inner result.
    #[instrument(skip_all)]
    pub async fn execute<E, F>(&self, root: &mut dyn Operator, mut f: F) -> DbResult<Result<(), E>>
    where
        F: FnMut(Tuple) -> Result<(), E> + Send,
        E: Send,
    {
        let ctx = ExecCtx {
            catalog: &self.catalog,
        };

        root.open(&ctx).await?;
        let mut outcome = Ok(());
        loop {
            match root.next(&ctx).await {
                Ok(Some(tuple)) => {
                    if let Err(error) = f(tuple) {
                        outcome = Err(error);
                        break;
                    }
                }
                Ok(None) => break,
                Err(error) => {
                    // Best effort close; the first error wins.
                    let _ = root.close(&ctx).await;
                    return Err(error);
                }
            }
        }
        root.close(&ctx).await?;
        Ok(outcome)
    }
}
