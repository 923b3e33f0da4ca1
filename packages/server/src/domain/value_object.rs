//! Value objects with validation at construction time.
//!
//! A value that made it past `new()` is structurally valid everywhere else
//! in the system, so the inner layers never re-validate.

use thiserror::Error;

/// Validation failures for user-supplied values.
///
/// These map to requester-only rejections at the protocol boundary; nothing
/// is mutated when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("room id must not be empty")]
    EmptyRoomId,
    #[error("room id must be at most {0} characters")]
    RoomIdTooLong(usize),
    #[error("user name must not be empty")]
    EmptyUserName,
    #[error("user name must be at most {0} characters")]
    UserNameTooLong(usize),
    #[error("message must not be empty")]
    EmptyMessage,
    #[error("message must be at most {0} characters")]
    MessageTooLong(usize),
}

/// Opaque room identifier, supplied by the client on join.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    pub const MAX_LEN: usize = 64;

    pub fn new(value: String) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyRoomId);
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(ValidationError::RoomIdTooLong(Self::MAX_LEN));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of one transport connection, assigned by the server at upgrade
/// time and stable for the life of that connection. Participants are keyed
/// by this, never by display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Generate a fresh connection identity.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// User-supplied display name. Not guaranteed unique within a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserName(String);

impl UserName {
    pub const MAX_LEN: usize = 32;

    pub fn new(value: String) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyUserName);
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(ValidationError::UserNameTooLong(Self::MAX_LEN));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for UserName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Chat message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    pub const MAX_LEN: usize = 2000;

    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        if value.chars().count() > Self::MAX_LEN {
            return Err(ValidationError::MessageTooLong(Self::MAX_LEN));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Unix timestamp in UTC milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_rejects_empty_value() {
        // テスト項目: 空の room id はバリデーションエラーになる
        // given (前提条件):
        let value = "   ".to_string();

        // when (操作):
        let result = RoomId::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(ValidationError::EmptyRoomId));
    }

    #[test]
    fn test_room_id_trims_whitespace() {
        // テスト項目: room id の前後の空白が除去される
        // given (前提条件):
        let value = "  r1  ".to_string();

        // when (操作):
        let room_id = RoomId::new(value).unwrap();

        // then (期待する結果):
        assert_eq!(room_id.as_str(), "r1");
    }

    #[test]
    fn test_room_id_rejects_overlong_value() {
        // テスト項目: 最大長を超える room id はバリデーションエラーになる
        // given (前提条件):
        let value = "x".repeat(RoomId::MAX_LEN + 1);

        // when (操作):
        let result = RoomId::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(ValidationError::RoomIdTooLong(RoomId::MAX_LEN)));
    }

    #[test]
    fn test_user_name_rejects_empty_value() {
        // テスト項目: 空のユーザー名はバリデーションエラーになる
        // given (前提条件):
        let value = "".to_string();

        // when (操作):
        let result = UserName::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(ValidationError::EmptyUserName));
    }

    #[test]
    fn test_message_content_rejects_blank_value() {
        // テスト項目: 空白のみのメッセージはバリデーションエラーになる
        // given (前提条件):
        let value = " \n ".to_string();

        // when (操作):
        let result = MessageContent::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(ValidationError::EmptyMessage));
    }

    #[test]
    fn test_message_content_keeps_inner_whitespace() {
        // テスト項目: メッセージ内部の空白は保持される
        // given (前提条件):
        let value = "hello  world".to_string();

        // when (操作):
        let content = MessageContent::new(value).unwrap();

        // then (期待する結果):
        assert_eq!(content.as_str(), "hello  world");
    }

    #[test]
    fn test_connection_ids_are_unique() {
        // テスト項目: 生成された接続 ID は一意である
        // given (前提条件):

        // when (操作):
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();

        // then (期待する結果):
        assert_ne!(a, b);
    }
}
