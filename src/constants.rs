/// File names of the configuration documents, relative to the config directory
pub const CONFIG_FILE: &str = "config.json";
pub const LANGUAGE_FILE: &str = "language.json";
pub const CHAMPION_NAMES_FILE: &str = "champion_names.json";
pub const ORIGIN_LISTS_FILE: &str = "origin_lists.json";

/// Scratch folder for downloaded archives and their extracted contents
pub const DEFAULT_WORK_FOLDER: &str = "__sets";

// Placeholders accepted in url and output templates
pub const LANGUAGE_PLACEHOLDERS: [&str; 3] = ["{language}", "{0}", "{}"];

// Dictionary categories
pub const TYPES_CATEGORY: &str = "types";
pub const SUBTYPES_CATEGORY: &str = "subtypes";

/// Marker in image file names for alternate artwork
pub const ALT_ART_MARKER: &str = "-alt";

/// Substitutes the language code into every placeholder of a template.
pub fn fill_language(template: &str, language: &str) -> String {
    LANGUAGE_PLACEHOLDERS
        .iter()
        .fold(template.to_string(), |acc, placeholder| acc.replace(placeholder, language))
}

/// Path of the card data file inside a set archive for one language
pub fn data_entry_path(set_folder: &str, language: &str) -> String {
    format!("{language}/data/{set_folder}-{language}.json")
}
