//! Fetch options: which relations of an entity the server should populate.
//!
//! Every relation slot is either absent (not requested) or holds the nested
//! fetch options of the related entity. Entity getters consult the slot to
//! decide between returning data and failing with `Error::NotFetched`.

/// Generates a fetch options type from its relation table.
///
/// For each relation `x` the type gets `with_x` (create on first use, then
/// return the same instance), `with_x_using` (install the given options,
/// replacing any previous ones), `has_x` and a getter `x`. Types declared
/// with a `sort:` type also get paging and `sort_by`.
macro_rules! fetch_options {
    (
        $(#[$meta:meta])*
        $name:ident = $type_name:literal $(, sort: $sort:ident)? {
            $($field:ident: $fetch:ident = $json:literal => $with:ident, $with_using:ident, $has:ident;)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            #[serde(rename = "@type", default)]
            type_tag: TypeTag<$name>,
            $(
                #[serde(rename = $json, default, skip_serializing_if = "Option::is_none")]
                $field: Option<Box<$fetch>>,
            )*
            $(
                #[serde(default, skip_serializing_if = "Option::is_none")]
                from: Option<u32>,
                #[serde(default, skip_serializing_if = "Option::is_none")]
                count: Option<u32>,
                #[serde(default, skip_serializing_if = "Option::is_none")]
                sort: Option<$sort>,
            )?
        }

        impl DtoType for $name {
            const TYPE_NAME: &'static str = $type_name;
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            $(
                pub fn $with(&mut self) -> &mut $fetch {
                    self.$field.get_or_insert_with(Default::default)
                }

                pub fn $with_using(&mut self, fetch_options: $fetch) -> &mut $fetch {
                    self.$field.insert(Box::new(fetch_options))
                }

                pub fn $has(&self) -> bool {
                    self.$field.is_some()
                }

                pub fn $field(&self) -> Option<&$fetch> {
                    self.$field.as_deref()
                }
            )*

            $(
                /// Index of the first object of the page to return.
                pub fn from(&mut self, from: u32) -> &mut Self {
                    self.from = Some(from);
                    self
                }

                /// Maximum number of objects to return.
                pub fn count(&mut self, count: u32) -> &mut Self {
                    self.count = Some(count);
                    self
                }

                pub fn page_from(&self) -> Option<u32> {
                    self.from
                }

                pub fn page_count(&self) -> Option<u32> {
                    self.count
                }

                pub fn sort_by(&mut self) -> &mut $sort {
                    self.sort.get_or_insert_with($sort::default)
                }

                pub fn sort_options(&self) -> Option<&$sort> {
                    self.sort.as_ref()
                }
            )?
        }
    };
}

pub mod catalog;
pub mod sort;

pub use catalog::*;
pub use sort::*;
