//! # Process-wide schema catalog
//!
//! The catalog is the single source of truth the frame codec consults at runtime: given a
//! message id it needs the compiled [`MessageSchema`] to read or write a payload. It is
//! initialized once (or re-initialized, replacing the previous state wholesale) and is safe to
//! read from many threads afterward — [`MessageSchema::included`] is the one thing that still
//! mutates post-init, and it does so through an atomic rather than a lock, since inclusion
//! toggling is an administrative operation, not a hot-path one.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::enums::EnumSchema;
use crate::errors::{InitError, UnknownMessageId};
use crate::loader::load_dialect_tree;
use crate::message::MessageSchema;
use crate::resolver::DialectResolver;
use crate::{compiler, MessageId};

/// Message id that must always remain included, per the MAVLink heartbeat contract: a connection
/// can't be recognized as alive if the one message every implementation sends can be filtered out.
const HEARTBEAT_MESSAGE_ID: MessageId = 0;

#[derive(Default)]
struct State {
    messages: HashMap<MessageId, MessageSchema>,
    enums: HashMap<String, EnumSchema>,
    commands_by_value: HashMap<i64, String>,
}

/// Process-wide catalog of compiled message and enum schemas.
///
/// All access goes through the associated functions on this type rather than an instance — there
/// is exactly one catalog per process, matching §5's "process-wide singleton" requirement.
pub struct Catalog;

static STATE: RwLock<Option<State>> = RwLock::new(None);

impl Catalog {
    /// Loads `root` (and its transitive includes) via `resolver`, compiles the result, and
    /// installs it as the process-wide catalog, replacing any previous one.
    ///
    /// `included_ids` restricts which messages start out included; an empty slice means "all
    /// messages included", matching [`Catalog::include_messages`].
    pub fn initialize(
        root: &str,
        resolver: &dyn DialectResolver,
        included_ids: &[MessageId],
    ) -> Result<(), InitError> {
        let bundle = load_dialect_tree(root, resolver)?;
        let compiled = compiler::compile(root, &bundle)?;

        let commands_by_value = compiled
            .enums
            .get("MAV_CMD")
            .map(|mav_cmd| {
                mav_cmd
                    .entries()
                    .iter()
                    .map(|entry| (entry.value(), entry.name().to_string()))
                    .collect()
            })
            .unwrap_or_default();

        let state = State {
            messages: compiled.messages,
            enums: compiled.enums,
            commands_by_value,
        };

        if !included_ids.is_empty() {
            for (id, message) in &state.messages {
                message.set_included(included_ids.contains(id));
            }
        }

        log::info!(
            "Catalog initialized from dialect {root:?}: {} messages, {} enums",
            state.messages.len(),
            state.enums.len(),
        );

        *STATE.write().expect("catalog lock poisoned") = Some(state);
        Ok(())
    }

    /// Looks up a message schema by id. Returns `None` both when the catalog is uninitialized and
    /// when the id is unknown — callers distinguish those with [`Catalog::is_initialized`].
    pub fn message(id: MessageId) -> Option<MessageSchema> {
        STATE
            .read()
            .expect("catalog lock poisoned")
            .as_ref()
            .and_then(|s| s.messages.get(&id).cloned())
    }

    /// Looks up an enum schema by name.
    pub fn r#enum(name: &str) -> Option<EnumSchema> {
        STATE
            .read()
            .expect("catalog lock poisoned")
            .as_ref()
            .and_then(|s| s.enums.get(name).cloned())
    }

    /// Looks up a `MAV_CMD` entry name by its integer value.
    pub fn command_name(value: i64) -> Option<String> {
        STATE
            .read()
            .expect("catalog lock poisoned")
            .as_ref()
            .and_then(|s| s.commands_by_value.get(&value).cloned())
    }

    /// Read-only view of every compiled message, keyed by id.
    pub fn messages() -> HashMap<MessageId, MessageSchema> {
        STATE
            .read()
            .expect("catalog lock poisoned")
            .as_ref()
            .map(|s| s.messages.clone())
            .unwrap_or_default()
    }

    /// Read-only view of every compiled enum, keyed by name.
    pub fn enums() -> HashMap<String, EnumSchema> {
        STATE
            .read()
            .expect("catalog lock poisoned")
            .as_ref()
            .map(|s| s.enums.clone())
            .unwrap_or_default()
    }

    /// `true` once [`Catalog::initialize`] has succeeded at least once.
    pub fn is_initialized() -> bool {
        STATE.read().expect("catalog lock poisoned").is_some()
    }

    /// Includes exactly the given message ids, excluding every other message. An empty slice
    /// means "include everything".
    pub fn include_messages(ids: &[MessageId]) -> Result<(), UnknownMessageId> {
        let guard = STATE.read().expect("catalog lock poisoned");
        let Some(state) = guard.as_ref() else {
            return Ok(());
        };

        if ids.is_empty() {
            for message in state.messages.values() {
                message.set_included(true);
            }
            return Ok(());
        }

        for id in ids {
            if !state.messages.contains_key(id) {
                return Err(UnknownMessageId(*id));
            }
        }

        for (id, message) in &state.messages {
            message.set_included(ids.contains(id));
        }
        Ok(())
    }

    /// Excludes the given message ids from decode/encode. Excluding [`HEARTBEAT_MESSAGE_ID`] is a
    /// silent no-op — the heartbeat must always remain included.
    pub fn exclude_messages(ids: &[MessageId]) -> Result<(), UnknownMessageId> {
        let guard = STATE.read().expect("catalog lock poisoned");
        let Some(state) = guard.as_ref() else {
            return Ok(());
        };

        for id in ids {
            if !state.messages.contains_key(id) {
                return Err(UnknownMessageId(*id));
            }
        }

        for id in ids {
            if *id == HEARTBEAT_MESSAGE_ID {
                continue;
            }
            if let Some(message) = state.messages.get(id) {
                message.set_included(false);
            }
        }
        Ok(())
    }

    /// Clears the catalog. Only used by tests that need isolation between cases — `initialize`
    /// already replaces any previous state on its own.
    #[cfg(test)]
    fn reset() {
        *STATE.write().expect("catalog lock poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::MapResolver;
    use std::sync::Mutex;

    // Catalog is process-global; serialize tests that touch it.
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    const HEARTBEAT_XML: &str = r#"<mavlink>
        <messages>
            <message id="0" name="HEARTBEAT">
                <field type="uint32_t" name="custom_mode"></field>
                <field type="uint8_t" name="type"></field>
            </message>
            <message id="30" name="ATTITUDE">
                <field type="uint32_t" name="time_boot_ms"></field>
                <field type="float" name="roll"></field>
            </message>
        </messages>
    </mavlink>"#;

    #[test]
    fn heartbeat_cannot_be_excluded() {
        let _guard = TEST_LOCK.lock().unwrap();
        Catalog::reset();
        let resolver = MapResolver::new().with("test", HEARTBEAT_XML);
        Catalog::initialize("test", &resolver, &[]).unwrap();

        Catalog::exclude_messages(&[0, 30]).unwrap();
        assert!(Catalog::message(0).unwrap().included());
        assert!(!Catalog::message(30).unwrap().included());
    }

    #[test]
    fn include_messages_empty_means_all() {
        let _guard = TEST_LOCK.lock().unwrap();
        Catalog::reset();
        let resolver = MapResolver::new().with("test", HEARTBEAT_XML);
        Catalog::initialize("test", &resolver, &[]).unwrap();

        Catalog::exclude_messages(&[30]).unwrap();
        assert!(!Catalog::message(30).unwrap().included());

        Catalog::include_messages(&[]).unwrap();
        assert!(Catalog::message(30).unwrap().included());
    }

    #[test]
    fn unknown_id_is_rejected() {
        let _guard = TEST_LOCK.lock().unwrap();
        Catalog::reset();
        let resolver = MapResolver::new().with("test", HEARTBEAT_XML);
        Catalog::initialize("test", &resolver, &[]).unwrap();

        assert!(matches!(Catalog::exclude_messages(&[999]), Err(UnknownMessageId(999))));
        assert!(matches!(Catalog::include_messages(&[999]), Err(UnknownMessageId(999))));
    }
}
