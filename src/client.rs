//! data-access seam
//!
//! the core never constructs or manages a data-access client; generated
//! resolvers reach one through a caller-supplied accessor over the request
//! context. the client itself is an opaque capability that executes crud
//! operations and relation reads against the underlying data source.

use crate::error::{Error, Result};
use crate::operation::Operation;
use serde_json::Value;
use std::sync::Arc;

/// opaque data-access capability invoked by generated resolvers
pub trait DataClient: Send + Sync {
    /// execute a root crud operation for a model
    fn execute(&self, model: &str, operation: Operation, args: Value) -> Result<Value>;

    /// refetch a record by identifier and read one of its relation fields
    fn relation(&self, model: &str, record_id: Value, field: &str, args: Value) -> Result<Value>;
}

/// accessor from the request context to the data client
///
/// supplied at [`crate::FieldBuilder`] construction time and captured by
/// every generated resolver.
pub type ClientAccessor<Ctx> = Arc<dyn Fn(&Ctx) -> Option<Arc<dyn DataClient>> + Send + Sync>;

/// resolve the client for a request, failing if the accessor yields none
pub(crate) fn expect_client<Ctx>(
    accessor: &ClientAccessor<Ctx>,
    ctx: &Ctx,
) -> Result<Arc<dyn DataClient>> {
    accessor(ctx).ok_or(Error::MissingDataClient)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullClient;

    impl DataClient for NullClient {
        fn execute(&self, _model: &str, _operation: Operation, _args: Value) -> Result<Value> {
            Ok(Value::Null)
        }

        fn relation(
            &self,
            _model: &str,
            _record_id: Value,
            _field: &str,
            _args: Value,
        ) -> Result<Value> {
            Ok(Value::Null)
        }
    }

    struct Ctx {
        client: Option<Arc<dyn DataClient>>,
    }

    #[test]
    fn test_expect_client() {
        let accessor: ClientAccessor<Ctx> = Arc::new(|ctx: &Ctx| ctx.client.clone());

        let ctx = Ctx {
            client: Some(Arc::new(NullClient)),
        };
        assert!(expect_client(&accessor, &ctx).is_ok());

        let ctx = Ctx { client: None };
        assert!(matches!(
            expect_client(&accessor, &ctx),
            Err(Error::MissingDataClient)
        ));
    }
}
