pub mod editor;
pub mod prompt_list;
pub mod versions;
