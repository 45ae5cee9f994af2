/// Display name for a vaccine in the reader's language. Only Spanish has translations.
pub fn localized_vaccine_name<'a>(name: &'a str, language: &str) -> &'a str {
    if !language.eq_ignore_ascii_case("es") {
        return name;
    }
    match name {
        "DA2PP" => "Quintuple Canina",
        "Deworming" => "Desparasitación",
        "Rabies" => "Rabia",
        "FVRCP" => "Triple Felina",
        _ => name,
    }
}
