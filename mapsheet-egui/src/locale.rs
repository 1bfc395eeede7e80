//! Panel label translations.
//!
//! The panel is constructed with a [`Locale`]; unknown codes fall back to
//! English. Only the strings the panel itself draws are translated. Log
//! messages stay English.

/// Languages the export panel ships labels for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    De,
    Fr,
    Fi,
    Sv,
    Vi,
}

impl Locale {
    /// Parse an ISO 639-1 code, case-insensitively. Anything unrecognised
    /// maps to English.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "de" => Locale::De,
            "fr" => Locale::Fr,
            "fi" => Locale::Fi,
            "sv" => Locale::Sv,
            "vi" => Locale::Vi,
            _ => Locale::En,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::De => "de",
            Locale::Fr => "fr",
            Locale::Fi => "fi",
            Locale::Sv => "sv",
            Locale::Vi => "vi",
        }
    }

    /// The label table for this locale.
    pub fn strings(self) -> &'static Translation {
        match self {
            Locale::En => &EN,
            Locale::De => &DE,
            Locale::Fr => &FR,
            Locale::Fi => &FI,
            Locale::Sv => &SV,
            Locale::Vi => &VI,
        }
    }
}

/// Every user-facing string the panel draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    pub page_size: &'static str,
    pub page_orientation: &'static str,
    pub format: &'static str,
    pub dpi: &'static str,
    pub scale: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub generate: &'static str,
    pub loading: &'static str,
    pub error_title: &'static str,
    pub invalid_scale: &'static str,
    pub ok: &'static str,
}

static EN: Translation = Translation {
    page_size: "Page Size",
    page_orientation: "Page Orientation",
    format: "Format",
    dpi: "DPI",
    scale: "Scale",
    title: "Title",
    subtitle: "SubTitle",
    generate: "Generate",
    loading: "Generating...",
    error_title: "Error",
    invalid_scale: "Enter valid input",
    ok: "OK",
};

static DE: Translation = Translation {
    page_size: "Seitenformat",
    page_orientation: "Seitenausrichtung",
    format: "Format",
    dpi: "DPI",
    scale: "Maßstab",
    title: "Titel",
    subtitle: "Untertitel",
    generate: "Erstellen",
    loading: "Wird erstellt...",
    error_title: "Fehler",
    invalid_scale: "Bitte eine gültige Eingabe machen",
    ok: "OK",
};

static FR: Translation = Translation {
    page_size: "Taille de page",
    page_orientation: "Orientation de page",
    format: "Format",
    dpi: "DPI",
    scale: "Échelle",
    title: "Titre",
    subtitle: "Sous-titre",
    generate: "Exporter",
    loading: "Export en cours...",
    error_title: "Erreur",
    invalid_scale: "Saisissez une valeur valide",
    ok: "OK",
};

static FI: Translation = Translation {
    page_size: "Sivun koko",
    page_orientation: "Sivun suunta",
    format: "Formaatti",
    dpi: "DPI",
    scale: "Mittakaava",
    title: "Otsikko",
    subtitle: "Alaotsikko",
    generate: "Luo",
    loading: "Luodaan...",
    error_title: "Virhe",
    invalid_scale: "Anna kelvollinen arvo",
    ok: "OK",
};

static SV: Translation = Translation {
    page_size: "Sidstorlek",
    page_orientation: "Sidorientering",
    format: "Format",
    dpi: "DPI",
    scale: "Skala",
    title: "Titel",
    subtitle: "Undertitel",
    generate: "Generera",
    loading: "Genererar...",
    error_title: "Fel",
    invalid_scale: "Ange ett giltigt värde",
    ok: "OK",
};

static VI: Translation = Translation {
    page_size: "Cỡ trang",
    page_orientation: "Hướng trang",
    format: "Định dạng",
    dpi: "DPI",
    scale: "Tỷ lệ",
    title: "Tiêu đề",
    subtitle: "Phụ đề",
    generate: "Tạo",
    loading: "Đang tạo...",
    error_title: "Lỗi",
    invalid_scale: "Nhập giá trị hợp lệ",
    ok: "OK",
};
