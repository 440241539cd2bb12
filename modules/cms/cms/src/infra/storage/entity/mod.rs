pub mod component;
pub mod content;
pub mod content_type;
pub mod content_value;
pub mod field;
pub mod value_boolean;
pub mod value_integer;
pub mod value_string;
pub mod value_text;
