pub mod accounts;
pub mod clock;
pub mod error;
pub mod notification;
pub mod pets;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{BusinessError, ServiceError, UserNotFoundError};
pub use notification::{MessageCommand, NotificationError, NotificationService, OutboxNotifier};
