//! Status helper enums mapping to SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Return the upper-case name stored in the lookup table.
            pub fn label(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }

            /// Resolve a database status ID, if it is known.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Background job lifecycle status.
    JobStatus {
        Pending = 1 => "PENDING",
        Running = 2 => "RUNNING",
        Done = 3 => "DONE",
        Failed = 4 => "FAILED",
    }
}

define_status_enum! {
    /// Daily attendance record status.
    AttendanceStatus {
        Pending = 1 => "PENDING",
        Approved = 2 => "APPROVED",
        Absent = 3 => "ABSENT",
        Leave = 4 => "LEAVE",
    }
}

impl JobStatus {
    /// Pending and running jobs hold the single-flight slot for their kind.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Running)
    }

    /// Done and failed are final; no transition leaves them.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}
