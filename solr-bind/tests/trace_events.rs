#![cfg(feature = "tracing")]

use std::fmt;
use std::sync::{Arc, Mutex};

use facet_testhelpers::test;
use solr_bind::DocumentMapping;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Metadata, Subscriber};

/// Collects the message of every event.
#[derive(Clone, Default)]
struct Messages(Arc<Mutex<Vec<String>>>);

struct MessageVisitor<'a>(&'a mut String);

impl Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            *self.0 = format!("{value:?}");
        }
    }
}

impl Subscriber for Messages {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _: &Id, _: &Record<'_>) {}

    fn record_follows_from(&self, _: &Id, _: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let mut message = String::new();
        event.record(&mut MessageVisitor(&mut message));
        self.0.lock().unwrap().push(message);
    }

    fn enter(&self, _: &Id) {}

    fn exit(&self, _: &Id) {}
}

#[derive(Debug, Default)]
struct Row {
    id: i32,
}

#[test]
fn document_events_bracket_each_document() {
    let mapping = DocumentMapping::<Row>::new().scalar("id", "id", |r: &mut Row, v| r.id = v);
    let xml = r#"<response><result name="response" numFound="2"><doc><int name="id">1</int><str name="extra">x</str></doc><doc><int name="id">2</int></doc></result></response>"#;

    let messages = Messages::default();
    let results = tracing::subscriber::with_default(messages.clone(), || {
        solr_bind::from_str(xml, &mapping)
    })
    .unwrap();
    assert_eq!(results.documents.len(), 2);
    assert_eq!(results.documents[1].id, 2);

    let seen = messages.0.lock().unwrap();
    let document_events: Vec<&str> = seen
        .iter()
        .map(String::as_str)
        .filter(|m| {
            ["building document", "built document", "skipping unmapped field"].contains(m)
        })
        .collect();
    assert_eq!(
        document_events,
        [
            "building document",
            "skipping unmapped field",
            "built document",
            "building document",
            "built document",
        ]
    );
}
