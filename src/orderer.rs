//! Commit order of registration records.
//!
//! Records are registered in descending order of their raw route pattern.
//! Under first-registered-wins dispatch this puts longer literal paths such as
//! `/items/new` ahead of the shorter `/items` they extend. It is a heuristic
//! and does not prove two patterns cannot match the same path.

use crate::{Dispatcher, RegistrationRecord, Result};

/// Sorts records by route pattern, descending.
///
/// The sort is stable: records with the same pattern keep their
/// accumulation order.
pub fn order(records: &mut [RegistrationRecord]) {
    records.sort_by(|a, b| b.route.cmp(&a.route));
}

/// Orders the records and registers each with the dispatcher.
///
/// Stops at the first dispatcher error; earlier registrations stay in place.
/// Returns the number of records committed.
pub fn commit<D>(mut records: Vec<RegistrationRecord>, dispatcher: &mut D) -> Result<usize>
where
    D: Dispatcher + ?Sized,
{
    order(&mut records);

    let total = records.len();
    for record in records {
        dispatcher.register(
            record.grouping,
            record.method,
            &record.route,
            &record.middlewares,
            record.controller,
        )?;
        tracing::debug!(
            method = %record.method,
            url = %record.url,
            route = %record.route,
            "Route registered"
        );
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Controller, Error, ErrorKind, HttpMethod, Middleware, ParamMiddleware};
    use crate::dispatcher::GroupingId;
    use proptest::prelude::*;

    #[derive(Default)]
    struct RegisterLog {
        routes: Vec<String>,
        fail_on: Option<&'static str>,
    }

    impl Dispatcher for RegisterLog {
        fn create_grouping(&mut self, _prefix: &str) -> Result<GroupingId> {
            Ok(GroupingId::new(0))
        }
        fn mount(&mut self, _: GroupingId, _: &str) -> Result<()> {
            Ok(())
        }
        fn use_middleware(&mut self, _: GroupingId, _: Middleware) -> Result<()> {
            Ok(())
        }
        fn param(&mut self, _: GroupingId, _: &str, _: ParamMiddleware) -> Result<()> {
            Ok(())
        }
        fn register(
            &mut self,
            _grouping: GroupingId,
            _method: HttpMethod,
            pattern: &str,
            _middlewares: &[Middleware],
            _controller: Controller,
        ) -> Result<()> {
            if self.fail_on == Some(pattern) {
                return Err(Error::dispatch("refused"));
            }
            self.routes.push(pattern.to_string());
            Ok(())
        }
    }

    fn record(route: &str, controller: &str) -> RegistrationRecord {
        RegistrationRecord {
            version: "v1".into(),
            grouping: GroupingId::new(0),
            method: HttpMethod::Get,
            route: route.into(),
            middlewares: vec![],
            controller: Controller::new(controller.to_string(), || async {}),
            url: format!("/api/v1{}", route),
        }
    }

    #[test]
    fn test_commit_registers_specific_paths_first() {
        let mut dispatcher = RegisterLog::default();
        let records = vec![record("/items", "list"), record("/items/:id", "show")];

        let committed = commit(records, &mut dispatcher).unwrap();

        assert_eq!(committed, 2);
        assert_eq!(dispatcher.routes, vec!["/items/:id", "/items"]);
    }

    #[test]
    fn test_order_is_stable_for_equal_patterns() {
        let mut records = vec![record("/a", "first"), record("/b", "b"), record("/a", "second")];
        order(&mut records);
        let names: Vec<_> = records.iter().map(|r| r.controller.name().to_string()).collect();
        assert_eq!(names, vec!["b", "first", "second"]);
    }

    #[test]
    fn test_sort_key_is_raw_route_not_url() {
        let mut v2 = record("/a", "v2-a");
        v2.url = "/api/v2/a".into();
        let mut records = vec![v2, record("/b", "v1-b")];
        order(&mut records);
        assert_eq!(records[0].route, "/b");
    }

    #[test]
    fn test_commit_stops_at_first_error() {
        let mut dispatcher = RegisterLog {
            fail_on: Some("/b"),
            ..Default::default()
        };
        let records = vec![record("/a", "a"), record("/b", "b"), record("/c", "c")];

        let err = commit(records, &mut dispatcher).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Dispatch);
        assert_eq!(dispatcher.routes, vec!["/c"]);
    }

    #[test]
    fn test_commit_empty() {
        let mut dispatcher = RegisterLog::default();
        assert_eq!(commit(vec![], &mut dispatcher).unwrap(), 0);
    }

    proptest! {
        #[test]
        fn prop_commit_order_is_descending(routes in proptest::collection::vec("/[a-z:/]{0,8}", 0..16)) {
            let mut dispatcher = RegisterLog::default();
            let records = routes.iter().map(|r| record(r, "c")).collect();
            commit(records, &mut dispatcher).unwrap();
            prop_assert_eq!(dispatcher.routes.len(), routes.len());
            prop_assert!(dispatcher.routes.windows(2).all(|w| w[0] >= w[1]));
        }
    }
}
