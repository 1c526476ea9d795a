use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

impl MoveCategory {
    /// Physical and Special moves deal damage; Status moves never do.
    pub fn is_offensive(self) -> bool {
        !matches!(self, MoveCategory::Status)
    }
}
