pub mod assistant;
pub mod booking;
pub mod notice;
pub mod plan;
pub mod session;
pub mod theme;
pub mod time_slot;
pub mod wall_time;

pub use assistant::{
    Assistant, AssistantId, AssistantStatus, AssistantUpdate, AssistantsResponse, AvailableDays,
    CreateAssistantForm, KnowledgeDocument, RegisterResponse, VoiceType,
};
pub use booking::{BackendSlot, Booking, BookingsResponse};
pub use notice::{Notice, NoticeLevel};
pub use plan::Plan;
pub use session::{CurrentUserResponse, RemoteUser, Session};
pub use theme::Theme;
pub use time_slot::TimeSlot;
pub use wall_time::WallTime;
