mod create;
mod init;
mod inspect;
mod misc;
mod reveal;
mod salt;
mod verify;

pub use create::handle_create;
pub use init::handle_init;
pub use inspect::handle_inspect;
pub use misc::handle_completions;
pub use reveal::handle_reveal;
pub use salt::handle_salt;
pub use verify::handle_verify;
