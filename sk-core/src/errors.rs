pub use anyhow::{
    anyhow,
    bail,
    ensure,
    Context,
};
pub use paste::paste;
pub use thiserror::Error;

pub use crate::err_impl;

/// Result of an operation that only reports success or failure.
pub type EmptyResult = anyhow::Result<()>;

// Declares a thiserror enum and, for every variant carrying a `String`, a snake-case constructor
// that wraps the variant in an `anyhow::Error`:
//
//     err_impl! {
//         /// Things that go wrong with foo.
//         FooError,
//
//         /// Bar was rejected.
//         #[error("bar went wrong: {0}")]
//         Bar(String),
//     }
//
//     return Err(FooError::bar("details"));
#[macro_export]
macro_rules! err_impl {
    (@hidden $errtype:ident, $item:ident, String) => {
        $crate::errors::paste! {
            #[doc = "Wraps [`" $errtype "::" $item "`] in an `anyhow::Error`."]
            pub fn [<$item:snake>](in_: &str) -> anyhow::Error {
                anyhow::anyhow!{$errtype::$item(in_.into())}
            }
        }
    };

    ($(#[$errdoc:meta])* $errtype:ident,
        $($(#[$errinfo:meta])+ $item:ident($($dtype:tt)*),)+
    ) => {
        $(#[$errdoc])*
        #[derive(Debug, Error)]
        pub enum $errtype {
            $($(#[$errinfo])+ $item($($dtype)*)),+
        }

        impl $errtype {
            $($crate::err_impl! {@hidden $errtype, $item, $($dtype)*})+
        }
    };
}
