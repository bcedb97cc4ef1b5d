// chatfill — a hanging-indent layout engine for chat transcripts
// Copyright (C) 2026  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::transcript::MessageId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("layout is not active for this transcript view")]
    Inactive,
    #[error("invalid message range {start}..{end}")]
    InvalidRange { start: MessageId, end: MessageId },
    #[error("message {0} not found in transcript")]
    UnknownMessage(MessageId),
}

impl LayoutError {
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Inactive => {
                "Hanging-indent layout is not active for this view. Enable it and retry."
            }
            Self::InvalidRange { .. } => "The requested message range is reversed or malformed.",
            Self::UnknownMessage(_) => "The referenced message does not exist in this transcript.",
        }
    }
}
