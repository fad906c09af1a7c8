use std::sync::{Arc, RwLock};

use tessera_catalog::MetadataStore;
use tessera_result::{Error, Result};

use crate::store::ColumnStore;

/// Process-wide handle to the node's store clients.
///
/// Initialized once per node before serving; torn down explicitly at
/// process stop. Tests inject their own stores through
/// [`NodeContext::init`] and call [`NodeContext::shutdown`] between cases.
pub struct NodeContext {
    pub meta: Arc<dyn MetadataStore>,
    pub store: Arc<dyn ColumnStore>,
}

static NODE: RwLock<Option<Arc<NodeContext>>> = RwLock::new(None);

impl NodeContext {
    /// Install the node-wide context. Fails if one is already installed.
    pub fn init(meta: Arc<dyn MetadataStore>, store: Arc<dyn ColumnStore>) -> Result<()> {
        let mut slot = NODE.write().expect("node context lock poisoned");
        if slot.is_some() {
            return Err(Error::invalid_argument(
                "node context is already initialized",
            ));
        }
        *slot = Some(Arc::new(NodeContext { meta, store }));
        Ok(())
    }

    /// The installed context, or an error before `init`/after `shutdown`.
    pub fn get() -> Result<Arc<NodeContext>> {
        NODE.read()
            .expect("node context lock poisoned")
            .clone()
            .ok_or_else(|| Error::invalid_argument("node context is not initialized"))
    }

    /// Tear down the node-wide context.
    pub fn shutdown() {
        *NODE.write().expect("node context lock poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mem::MemColumnStore;
    use tessera_catalog::MemMetaStore;

    #[test]
    fn init_get_shutdown_lifecycle() {
        assert!(NodeContext::get().is_err());

        NodeContext::init(
            Arc::new(MemMetaStore::new()),
            Arc::new(MemColumnStore::new()),
        )
        .unwrap();
        assert!(NodeContext::get().is_ok());
        // Double init is refused while a context is installed.
        assert!(
            NodeContext::init(
                Arc::new(MemMetaStore::new()),
                Arc::new(MemColumnStore::new()),
            )
            .is_err()
        );

        NodeContext::shutdown();
        assert!(NodeContext::get().is_err());
    }
}
