use serde::{Serialize, Serializer};

use crate::{
    ident::{normalize, InvalidIdentifier},
    Event, Time,
};

/// Selects the identifier every packed record is filed under.
///
/// Without a fixed metric id, each event's own `service` is normalized. With one,
/// that id wins for the whole batch. The organization prefixes either way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Routing {
    metric_id: Option<String>,
    organization: Option<String>,
}
impl Routing {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_metric_id(mut self, metric_id: impl Into<String>) -> Self {
        self.metric_id = Some(metric_id.into());
        self
    }
    #[must_use]
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn metric_id(&self) -> Option<&str> {
        self.metric_id.as_deref()
    }
    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    /// Packs a batch, all or nothing.
    pub fn pack(&self, events: &[Event]) -> Result<Vec<PackedRecord>, InvalidIdentifier> {
        let organization = self.organization.as_deref();
        match &self.metric_id {
            Some(metric_id) => {
                let id = normalize(metric_id, organization)?;
                Ok(events
                    .iter()
                    .map(|event| PackedRecord::new(event, id.clone()))
                    .collect())
            }
            None => events
                .iter()
                .map(|event| {
                    let id = normalize(&event.service, organization)?;
                    Ok(PackedRecord::new(event, id))
                })
                .collect(),
        }
    }
}

/// Wire unit, serialized as `[host, identifier, metric, time]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedRecord {
    pub host: String,
    pub identifier: String,
    pub metric: f64,
    pub time: Time,
}
impl PackedRecord {
    fn new(event: &Event, identifier: String) -> Self {
        Self {
            host: event.host.clone(),
            identifier,
            metric: event.metric,
            time: event.time,
        }
    }
}
impl Serialize for PackedRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (&self.host, &self.identifier, self.metric, self.time).serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(host: &str, service: &str, metric: f64, time: Time) -> Event {
        Event {
            host: host.into(),
            service: service.into(),
            metric,
            time,
        }
    }

    fn batch() -> Vec<Event> {
        vec![
            event("h1", "cpu load", 0.5, 100),
            event("h2", "disk@used", 42.0, 101),
            event("h1", "mem free", 7.25, 102),
        ]
    }

    fn identifiers(records: &[PackedRecord]) -> Vec<&str> {
        records.iter().map(|r| r.identifier.as_str()).collect()
    }

    #[test]
    fn single_event() {
        let records = Routing::new()
            .pack(&[event("h1", "cpu load", 0.5, 100)])
            .unwrap();
        assert_eq!(
            records,
            vec![PackedRecord {
                host: "h1".into(),
                identifier: "CPU_LOAD".into(),
                metric: 0.5,
                time: 100,
            }]
        );
    }

    #[test]
    fn service_derived() {
        let records = Routing::new().pack(&batch()).unwrap();
        assert_eq!(identifiers(&records), ["CPU_LOAD", "DISKUSED", "MEM_FREE"]);
    }

    #[test]
    fn service_derived_with_organization() {
        let records = Routing::new()
            .with_organization("acme")
            .pack(&batch())
            .unwrap();
        assert_eq!(
            identifiers(&records),
            ["ACME_CPU_LOAD", "ACME_DISKUSED", "ACME_MEM_FREE"]
        );
    }

    #[test]
    fn fixed_identifier() {
        let records = Routing::new()
            .with_metric_id("load avg")
            .pack(&batch())
            .unwrap();
        assert_eq!(identifiers(&records), ["LOAD_AVG"; 3]);
    }

    #[test]
    fn fixed_identifier_with_organization() {
        let records = Routing::new()
            .with_metric_id("load avg")
            .with_organization("acme")
            .pack(&batch())
            .unwrap();
        assert_eq!(identifiers(&records), ["ACME_LOAD_AVG"; 3]);
    }

    #[test]
    fn order_and_values_preserved() {
        let events = batch();
        let records = Routing::new().pack(&events).unwrap();
        for (event, record) in events.iter().zip(&records) {
            assert_eq!(record.host, event.host);
            assert_eq!(record.metric, event.metric);
            assert_eq!(record.time, event.time);
        }
    }

    #[test]
    fn empty_batch() {
        assert!(Routing::new().pack(&[]).unwrap().is_empty());
        assert!(Routing::new()
            .with_organization("acme")
            .pack(&[])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn invalid_fixed_identifier_fails_even_when_empty() {
        let routing = Routing::new().with_metric_id("?!").with_organization("acme");
        assert!(routing.pack(&[]).is_err());
        assert!(routing.pack(&batch()).is_err());
    }

    #[test]
    fn one_bad_service_fails_the_batch() {
        let mut events = batch();
        events.push(event("h3", "%%%", 1.0, 103));
        let err = Routing::new().pack(&events).unwrap_err();
        assert_eq!(err.label, "%%%");
    }

    #[test]
    fn fixed_identifier_ignores_bad_services() {
        let events = vec![event("h3", "%%%", 1.0, 103)];
        let records = Routing::new().with_metric_id("ok").pack(&events).unwrap();
        assert_eq!(identifiers(&records), ["OK"]);
    }

    #[test]
    fn serializes_as_array() {
        let records = Routing::new()
            .pack(&[event("h1", "cpu load", 0.5, 100)])
            .unwrap();
        let json = serde_json::to_value(&records).unwrap();
        assert_eq!(json, serde_json::json!([["h1", "CPU_LOAD", 0.5, 100]]));
    }
}
