//! Macros for declaring resource payloads
//!
//! A payload is declared once, as a struct whose every field carries its
//! wire kind; the macros generate the serde derives, the [`Payload`]
//! schema and the endpoint wiring from that single declaration, so the
//! Rust type and the validated shape cannot drift apart.
//!
//! [`Payload`]: crate::core::resource::Payload

/// Helper macro translating a kind token into a [`FieldKind`] value
///
/// Kinds: `string`, `integer`, `float`, `boolean`, `date`, `datetime`,
/// `any`, `array of <kind>` and `object <Type>` (where `<Type>` is another
/// payload).
///
/// [`FieldKind`]: crate::core::schema::FieldKind
#[macro_export]
macro_rules! field_kind {
    (string) => {
        $crate::core::schema::FieldKind::String
    };
    (integer) => {
        $crate::core::schema::FieldKind::Integer
    };
    (float) => {
        $crate::core::schema::FieldKind::Float
    };
    (boolean) => {
        $crate::core::schema::FieldKind::Boolean
    };
    (date) => {
        $crate::core::schema::FieldKind::Date
    };
    (datetime) => {
        $crate::core::schema::FieldKind::DateTime
    };
    (any) => {
        $crate::core::schema::FieldKind::Any
    };

    // array of <kind>, recursing into the element kind
    (array of $($inner:tt)+) => {
        $crate::core::schema::FieldKind::Array(Box::new($crate::field_kind!($($inner)+)))
    };

    // object <Type>, validated against that payload's schema
    (object $payload:ty) => {
        $crate::core::schema::FieldKind::Object(
            <$payload as $crate::core::resource::Payload>::schema,
        )
    };
}

/// Helper macro adding one declared field to a schema under construction
///
/// The bracket group may start with `nullable` (key required, `null`
/// accepted) or `optional` (key may be absent); bare kinds are required
/// and non-null.
#[macro_export]
macro_rules! schema_field {
    ($schema:expr, $fname:ident, [nullable $($kind:tt)+]) => {
        $schema.nullable(stringify!($fname), $crate::field_kind!($($kind)+))
    };
    ($schema:expr, $fname:ident, [optional $($kind:tt)+]) => {
        $schema.optional(stringify!($fname), $crate::field_kind!($($kind)+))
    };
    ($schema:expr, $fname:ident, [$($kind:tt)+]) => {
        $schema.field(stringify!($fname), $crate::field_kind!($($kind)+))
    };
}

/// Declare a payload struct together with its schema
///
/// Every field is annotated with the kind the backend is expected to send,
/// so one declaration produces both the Rust type and the validation that
/// guards its decoding.
///
/// # Example
///
/// ```rust,ignore
/// define_payload!(
///     /// A saved beneficiary bank account
///     pub struct Bank {
///         id: i64 => [integer],
///         beneficiary_name: String => [string],
///         iban: Option<String> => [nullable string],
///         currency: Option<CurrencyRef> => [optional object CurrencyRef],
///     }
/// );
///
/// assert!(Bank::schema().validate(&payload).is_ok());
/// ```
#[macro_export]
macro_rules! define_payload {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fname:ident : $fty:ty => [$($kind:tt)+]
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                pub $fname: $fty,
            )+
        }

        impl $crate::core::resource::Payload for $name {
            fn schema() -> &'static $crate::core::schema::Schema {
                static SCHEMA: ::std::sync::OnceLock<$crate::core::schema::Schema> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    let schema = $crate::core::schema::Schema::object(stringify!($name));
                    $(
                        let schema = $crate::schema_field!(schema, $fname, [$($kind)+]);
                    )+
                    schema
                })
            }
        }
    };
}

/// Wire a payload to its resource family and read endpoints
///
/// The `family` shorthand derives the conventional endpoint names
/// (`<family>-index`, `<family>-detail`); the long form spells all three
/// out for irregular families.
///
/// # Example
///
/// ```rust,ignore
/// define_resource!(Bank, family = "bank");
///
/// // equivalent to
/// define_resource!(
///     Bank,
///     resource = "bank",
///     index = "bank-index",
///     detail = "bank-detail"
/// );
/// ```
#[macro_export]
macro_rules! define_resource {
    ($name:ident, family = $family:literal) => {
        $crate::define_resource!(
            $name,
            resource = $family,
            index = concat!($family, "-index"),
            detail = concat!($family, "-detail")
        );
    };
    ($name:ident, resource = $resource:expr, index = $index:expr, detail = $detail:expr) => {
        impl $crate::core::resource::Resource for $name {
            fn resource_name() -> &'static str {
                $resource
            }

            fn list_endpoint() -> &'static str {
                $index
            }

            fn detail_endpoint() -> &'static str {
                $detail
            }
        }
    };
}

/// Wire a resource to its create and update endpoints
///
/// # Example
///
/// ```rust,ignore
/// resource_mutations!(Bank, family = "bank");
///
/// let outcome = client.create::<Bank>().send(&new_bank).await?;
/// ```
#[macro_export]
macro_rules! resource_mutations {
    ($name:ident, family = $family:literal) => {
        $crate::resource_mutations!(
            $name,
            create = concat!($family, "-create"),
            update = concat!($family, "-update")
        );
    };
    ($name:ident, create = $create:expr, update = $update:expr) => {
        impl $crate::core::resource::MutableResource for $name {
            fn create_endpoint() -> &'static str {
                $create
            }

            fn update_endpoint() -> &'static str {
                $update
            }
        }
    };
}
