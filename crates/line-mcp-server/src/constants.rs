//! Constants used by the MCP tools

/// Informational message limit reported when the caller gives none
pub const DEFAULT_MESSAGE_LIMIT: u32 = 100;

/// Accepted format of the `date` argument
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format of `chatRoomUpdatedAt` (local time)
pub const UPDATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
