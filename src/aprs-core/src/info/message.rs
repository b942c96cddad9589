// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use serde::Serialize;

use crate::error::{AprsError, AprsResult};
use crate::packet_type::PacketType;

const ADDRESSEE_LEN: usize = 9;
const MAX_CONTENT_LEN: usize = 67;
const MAX_ID_LEN: usize = 5;
const FORBIDDEN: [char; 3] = ['|', '~', '{'];

/// Message (`:ADDRESSEE:text{id`). A closing `}` after the id is accepted
/// on decode and dropped on encode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageInfo {
    addressee: String,
    content: String,
    message_id: Option<String>,
}

impl MessageInfo {
    pub fn new(
        addressee: impl Into<String>,
        content: impl Into<String>,
        message_id: Option<String>,
    ) -> AprsResult<Self> {
        let addressee = addressee.into();
        let content = content.into();

        if addressee.is_empty() || addressee.chars().count() > ADDRESSEE_LEN {
            return Err(AprsError::format(format!(
                "addressee {:?} must be 1 to {} characters",
                addressee, ADDRESSEE_LEN
            )));
        }
        if content.chars().count() > MAX_CONTENT_LEN {
            return Err(AprsError::format(format!(
                "message text longer than {} characters",
                MAX_CONTENT_LEN
            )));
        }
        if let Some(c) = content.chars().find(|c| FORBIDDEN.contains(c)) {
            return Err(AprsError::format(format!(
                "message text contains forbidden {:?}",
                c
            )));
        }
        if let Some(id) = &message_id {
            if id.is_empty()
                || id.len() > MAX_ID_LEN
                || !id.bytes().all(|b| b.is_ascii_alphanumeric())
            {
                return Err(AprsError::format(format!(
                    "message id {:?} must be 1 to {} alphanumerics",
                    id, MAX_ID_LEN
                )));
            }
        }

        Ok(Self {
            addressee,
            content,
            message_id,
        })
    }

    pub fn decode(payload: &str) -> AprsResult<Self> {
        let body = payload
            .strip_prefix(':')
            .ok_or_else(|| AprsError::format(format!("{:?} is not a message", payload)))?;
        let addressee = body
            .get(..ADDRESSEE_LEN)
            .ok_or_else(|| AprsError::format("message addressee truncated"))?;
        let text = body[ADDRESSEE_LEN..]
            .strip_prefix(':')
            .ok_or_else(|| AprsError::format("no ':' after the message addressee"))?;

        let (content, message_id) = match text.rsplit_once('{') {
            Some((content, id)) => {
                let id = id.strip_suffix('}').unwrap_or(id);
                (content, Some(id.to_string()))
            }
            None => (text, None),
        };
        Self::new(addressee.trim_end(), content, message_id)
    }

    pub fn encode(&self) -> AprsResult<String> {
        let mut out = format!(
            ":{:<width$}:{}",
            self.addressee,
            self.content,
            width = ADDRESSEE_LEN
        );
        if let Some(id) = &self.message_id {
            out.push('{');
            out.push_str(id);
        }
        Ok(out)
    }

    pub fn packet_type(&self) -> PacketType {
        PacketType::Message
    }

    pub fn addressee(&self) -> &str {
        &self.addressee
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    /// A message id asks the addressee to acknowledge delivery.
    pub fn wants_ack(&self) -> bool {
        self.message_id.is_some()
    }
}
