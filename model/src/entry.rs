// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Deserialization of ordered action entries.
//!
//! An entry is a map with an optional `order` and the tagged action flattened next to it. An
//! entry holding nothing but its order has no action. Anything else must parse as an action,
//! and a malformed action fails the whole entry.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_yaml_ng::{Mapping, Value};

/// Wire form of an ordered entry, before the action is parsed.
#[derive(Deserialize)]
pub(crate) struct RawEntry<O> {
    order: Option<O>,
    #[serde(flatten)]
    rest: Mapping,
}

impl<O> RawEntry<O> {
    /// Split the entry into its order and its action.
    pub(crate) fn into_parts<A: DeserializeOwned>(
        self,
    ) -> Result<(Option<O>, Option<A>), serde_yaml_ng::Error> {
        if self.rest.is_empty() {
            return Ok((self.order, None));
        }
        let action = serde_yaml_ng::from_value(Value::Mapping(self.rest))?;
        Ok((self.order, Some(action)))
    }
}
