use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Page-level configuration for the admin UI.
///
/// Every field has a default matching the stock admin templates, so an empty
/// JSON object (or no config block at all) yields a working setup.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AdminUiConfig {
    pub fields: FieldRules,
    pub tooltips: TooltipOptions,
    pub dropdowns: DropdownOptions,
    pub sidebar: SidebarOptions,
    pub alerts: AlertOptions,
    pub delete_guard: DeleteGuardOptions,
    pub confirm: ConfirmOptions,
    pub file_preview: FilePreviewOptions,
    pub file_label: FileLabelOptions,
    pub money: MoneyStyle,
    pub debug: bool,
}

impl AdminUiConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("invalid admin UI config JSON")
    }

    /// All page-wide behaviors, in the order they are attached at start-up.
    pub fn behaviors(&self) -> Vec<Behavior> {
        vec![
            Behavior::Tooltip(self.tooltips.clone()),
            Behavior::DeleteGuard(self.delete_guard.clone()),
            Behavior::ConfirmGuard(self.confirm.clone()),
            Behavior::FilePreview(self.file_preview.clone()),
            Behavior::AutoHideAlert(self.alerts.clone()),
            Behavior::Dropdown(self.dropdowns.clone()),
            Behavior::SidebarToggle(self.sidebar.clone()),
            Behavior::MoneyFormat(self.money.clone()),
            Behavior::FileLabel(self.file_label.clone()),
        ]
    }
}

// ── Repeatable fields ──

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldRules {
    /// Class marking a field group inside a container.
    pub group_class: String,
    /// Tags whose `name` attribute carries a bracketed index.
    pub field_tags: Vec<String>,
    /// Reindex the surviving groups after a removal.
    pub renumber_on_remove: bool,
}

impl Default for FieldRules {
    fn default() -> Self {
        Self {
            group_class: "form-group".to_owned(),
            field_tags: vec!["input".to_owned(), "select".to_owned(), "textarea".to_owned()],
            renumber_on_remove: false,
        }
    }
}

impl FieldRules {
    pub fn group_selector(&self) -> String {
        format!(".{}", self.group_class)
    }

    pub fn field_selector(&self) -> String {
        self.field_tags.join(", ")
    }

    pub fn is_field_tag(&self, tag: &str) -> bool {
        self.field_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

// ── Behaviors ──

/// One progressive enhancement attached to server-rendered elements.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Behavior {
    Tooltip(TooltipOptions),
    Dropdown(DropdownOptions),
    SidebarToggle(SidebarOptions),
    AutoHideAlert(AlertOptions),
    DeleteGuard(DeleteGuardOptions),
    ConfirmGuard(ConfirmOptions),
    FilePreview(FilePreviewOptions),
    FileLabel(FileLabelOptions),
    MoneyFormat(MoneyStyle),
}

impl Behavior {
    pub fn kind(&self) -> &'static str {
        match self {
            Behavior::Tooltip(_) => "tooltip",
            Behavior::Dropdown(_) => "dropdown",
            Behavior::SidebarToggle(_) => "sidebar-toggle",
            Behavior::AutoHideAlert(_) => "auto-hide-alert",
            Behavior::DeleteGuard(_) => "delete-guard",
            Behavior::ConfirmGuard(_) => "confirm-guard",
            Behavior::FilePreview(_) => "file-preview",
            Behavior::FileLabel(_) => "file-label",
            Behavior::MoneyFormat(_) => "money-format",
        }
    }

    /// CSS selector for the elements this behavior attaches to.
    pub fn selector(&self) -> &str {
        match self {
            Behavior::Tooltip(o) => &o.selector,
            Behavior::Dropdown(o) => &o.toggle_selector,
            Behavior::SidebarToggle(o) => &o.toggle_selector,
            Behavior::AutoHideAlert(o) => &o.selector,
            Behavior::DeleteGuard(o) => &o.selector,
            Behavior::ConfirmGuard(o) => &o.selector,
            Behavior::FilePreview(o) => &o.selector,
            Behavior::FileLabel(o) => &o.selector,
            Behavior::MoneyFormat(o) => &o.selector,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct TooltipOptions {
    pub selector: String,
}

impl Default for TooltipOptions {
    fn default() -> Self {
        Self {
            selector: r#"[data-bs-toggle="tooltip"]"#.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct DropdownOptions {
    pub toggle_selector: String,
    pub menu_selector: String,
    pub open_class: String,
}

impl Default for DropdownOptions {
    fn default() -> Self {
        Self {
            toggle_selector: ".dropdown-toggle".to_owned(),
            menu_selector: ".dropdown-menu".to_owned(),
            open_class: "show".to_owned(),
        }
    }
}

impl DropdownOptions {
    pub fn open_menu_selector(&self) -> String {
        format!("{}.{}", self.menu_selector, self.open_class)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct SidebarOptions {
    pub toggle_selector: String,
    pub sidebar_selector: String,
    pub open_class: String,
}

impl Default for SidebarOptions {
    fn default() -> Self {
        Self {
            toggle_selector: ".navbar-toggler".to_owned(),
            sidebar_selector: "#sidebar".to_owned(),
            open_class: "show".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct AlertOptions {
    pub selector: String,
    pub close_selector: String,
    pub delay_ms: u32,
}

impl Default for AlertOptions {
    fn default() -> Self {
        Self {
            selector: ".alert:not(.alert-permanent)".to_owned(),
            close_selector: ".btn-close".to_owned(),
            delay_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct DeleteGuardOptions {
    pub selector: String,
    pub message: String,
}

impl Default for DeleteGuardOptions {
    fn default() -> Self {
        Self {
            selector: ".btn-delete".to_owned(),
            message: "Вы уверены, что хотите удалить этот элемент?".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfirmOptions {
    pub selector: String,
    pub attribute: String,
    pub default_message: String,
}

impl Default for ConfirmOptions {
    fn default() -> Self {
        Self {
            selector: "[data-confirm]".to_owned(),
            attribute: "data-confirm".to_owned(),
            default_message: "Вы уверены, что хотите выполнить это действие?".to_owned(),
        }
    }
}

impl ConfirmOptions {
    /// An absent or empty attribute falls back to the default message.
    pub fn message_for<'a>(&'a self, attribute_value: Option<&'a str>) -> &'a str {
        match attribute_value {
            Some(m) if !m.is_empty() => m,
            _ => &self.default_message,
        }
    }
}

/// What a confirmed `[data-confirm]` click does next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmFollowUp {
    SubmitForm,
    Navigate(String),
    Nothing,
}

impl ConfirmFollowUp {
    /// An enclosing form wins over an anchor's `href`.
    pub fn resolve(in_form: bool, tag_name: &str, href: Option<String>) -> Self {
        if in_form {
            return ConfirmFollowUp::SubmitForm;
        }
        match href {
            Some(href) if tag_name.eq_ignore_ascii_case("a") => ConfirmFollowUp::Navigate(href),
            _ => ConfirmFollowUp::Nothing,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct FilePreviewOptions {
    pub selector: String,
    /// Attribute holding the id of the preview element.
    pub attribute: String,
}

impl Default for FilePreviewOptions {
    fn default() -> Self {
        Self {
            selector: r#"input[type="file"][data-preview]"#.to_owned(),
            attribute: "data-preview".to_owned(),
        }
    }
}

impl FilePreviewOptions {
    /// Id of the preview element named by the input's attribute. Inputs
    /// whose preview does not exist at start-up are never wired up.
    pub fn preview_id<'a>(&self, attribute_value: Option<&'a str>) -> Option<&'a str> {
        attribute_value.filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct FileLabelOptions {
    pub selector: String,
    pub label_class: String,
    pub placeholder: String,
}

impl Default for FileLabelOptions {
    fn default() -> Self {
        Self {
            selector: r#"input[type="file"]"#.to_owned(),
            label_class: "custom-file-label".to_owned(),
            placeholder: "Выберите файл".to_owned(),
        }
    }
}

impl FileLabelOptions {
    pub fn label_text(&self, first_file_name: Option<&str>) -> String {
        first_file_name.unwrap_or(&self.placeholder).to_owned()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolPosition {
    Prefix,
    Suffix,
}

/// Currency rendering rules. Defaults reproduce `ru-RU` / `RUB`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct MoneyStyle {
    pub selector: String,
    pub symbol: String,
    pub symbol_position: SymbolPosition,
    pub symbol_separator: String,
    pub group_separator: String,
    pub decimal_separator: String,
    pub minus_sign: String,
    pub fraction_digits: usize,
}

impl Default for MoneyStyle {
    fn default() -> Self {
        Self {
            selector: ".money-format".to_owned(),
            symbol: "₽".to_owned(),
            symbol_position: SymbolPosition::Suffix,
            symbol_separator: "\u{a0}".to_owned(),
            group_separator: "\u{a0}".to_owned(),
            decimal_separator: ",".to_owned(),
            minus_sign: "-".to_owned(),
            fraction_digits: 2,
        }
    }
}
