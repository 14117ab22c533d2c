mod init;
mod migrate;
mod show;
mod verify;

pub use init::cmd_init;
pub use migrate::cmd_migrate;
pub use show::cmd_show;
pub use verify::cmd_verify;
