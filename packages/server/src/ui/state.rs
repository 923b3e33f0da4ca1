//! Server state and connection management.

use std::sync::Arc;

use crate::domain::MessagePusher;
use crate::infrastructure::SessionRegistry;
use crate::usecase::{
    ChangeLanguageUseCase, ChatUseCase, EditCodeUseCase, JoinRoomUseCase, LeaveRoomUseCase,
    RunCodeUseCase, ToggleTypingLockUseCase,
};

/// Shared application state
pub struct AppState {
    /// JoinRoomUseCase（Room 参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// LeaveRoomUseCase（Room 退出のユースケース）
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// EditCodeUseCase（コード編集のユースケース）
    pub edit_code_usecase: Arc<EditCodeUseCase>,
    /// ChangeLanguageUseCase（言語変更のユースケース）
    pub change_language_usecase: Arc<ChangeLanguageUseCase>,
    /// ToggleTypingLockUseCase（タイピングロックのユースケース）
    pub toggle_typing_lock_usecase: Arc<ToggleTypingLockUseCase>,
    /// ChatUseCase（チャットのユースケース）
    pub chat_usecase: Arc<ChatUseCase>,
    /// RunCodeUseCase（コード実行のユースケース）
    pub run_code_usecase: Arc<RunCodeUseCase>,
    /// MessagePusher（メッセージ通知の抽象化）
    pub message_pusher: Arc<dyn MessagePusher>,
    /// SessionRegistry（Room の台帳。HTTP の一覧・詳細と eviction sweep が参照）
    pub registry: Arc<SessionRegistry>,
}
