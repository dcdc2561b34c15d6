use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parse a record date tolerantly. Plain ISO dates ("2024-03-01") and full
/// RFC 3339 timestamps both resolve to their calendar date; anything else is
/// None. All date normalization happens through here so records written with
/// either shape behave the same everywhere.
pub fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    None
}

/// A farm record.
///
/// Farm ID format: "farm::<epoch_millis>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Farm {
    pub id: String,
    pub name: String,
    /// Farm size in the unit given by `size_unit`
    pub size: f64,
    pub size_unit: SizeUnit,
    pub location: String,
    /// RFC 3339 timestamp
    pub created_at: String,
}

/// Unit the farm size is measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeUnit {
    Acres,
    Hectares,
    SqFt,
}

impl SizeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeUnit::Acres => "acres",
            SizeUnit::Hectares => "hectares",
            SizeUnit::SqFt => "sq_ft",
        }
    }

    /// Parse a stored unit key, defaulting to acres for anything unrecognized
    pub fn from_key(key: &str) -> Self {
        match key {
            "hectares" => SizeUnit::Hectares,
            "sq_ft" => SizeUnit::SqFt,
            _ => SizeUnit::Acres,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SizeUnit::Acres => "Acres",
            SizeUnit::Hectares => "Hectares",
            SizeUnit::SqFt => "Sq Ft",
        }
    }
}

/// A crop planted on a farm.
///
/// Crop ID format: "crop::<epoch_millis>". The growth stage is stored as a
/// free string so values written by older clients survive round-trips; the
/// known stages are listed in [`GrowthStage`]. Stage transitions are not
/// enforced - any stage can be set at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub id: String,
    pub farm_id: String,
    pub name: String,
    pub variety: String,
    /// ISO 8601 date (YYYY-MM-DD)
    pub planting_date: String,
    /// ISO 8601 date (YYYY-MM-DD)
    pub expected_harvest_date: String,
    pub growth_stage: String,
    /// Free-text field/plot identifier
    pub field: String,
}

/// Known growth stages, in their natural order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthStage {
    Planted,
    Germinated,
    Growing,
    Flowering,
    Fruiting,
    ReadyToHarvest,
    Harvested,
}

impl GrowthStage {
    pub const ALL: [GrowthStage; 7] = [
        GrowthStage::Planted,
        GrowthStage::Germinated,
        GrowthStage::Growing,
        GrowthStage::Flowering,
        GrowthStage::Fruiting,
        GrowthStage::ReadyToHarvest,
        GrowthStage::Harvested,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthStage::Planted => "planted",
            GrowthStage::Germinated => "germinated",
            GrowthStage::Growing => "growing",
            GrowthStage::Flowering => "flowering",
            GrowthStage::Fruiting => "fruiting",
            GrowthStage::ReadyToHarvest => "ready_to_harvest",
            GrowthStage::Harvested => "harvested",
        }
    }

    /// Parse a stored stage key. Unknown values return None; callers fall
    /// back to [`title_case`] for display.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_str() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            GrowthStage::Planted => "Planted",
            GrowthStage::Germinated => "Germinated",
            GrowthStage::Growing => "Growing",
            GrowthStage::Flowering => "Flowering",
            GrowthStage::Fruiting => "Fruiting",
            GrowthStage::ReadyToHarvest => "Ready to Harvest",
            GrowthStage::Harvested => "Harvested",
        }
    }
}

/// Display label for a growth stage key, tolerating unknown values
pub fn growth_stage_label(key: &str) -> String {
    match GrowthStage::from_key(key) {
        Some(stage) => stage.label().to_string(),
        None => title_case(key),
    }
}

/// A farm task.
///
/// Task ID format: "task::<epoch_millis>". The `status` field is the single
/// source of truth for the task lifecycle; `completed` is derived from it
/// (`status == Completed`) whenever a task is read or written and exists for
/// rendering convenience only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub farm_id: String,
    pub crop_id: Option<String>,
    pub task_type: String,
    pub description: String,
    /// ISO 8601 date (YYYY-MM-DD)
    pub due_date: String,
    pub priority: Priority,
    pub status: TaskStatus,
    /// Derived: true exactly when `status` is `Completed`
    pub completed: bool,
}

impl Task {
    /// Re-derive the `completed` flag from `status`
    pub fn sync_completed(&mut self) {
        self.completed = self.status == TaskStatus::Completed;
    }
}

/// Task priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Parse a stored priority key, defaulting to medium
    pub fn from_key(key: &str) -> Self {
        match key {
            "low" => Priority::Low,
            "high" => Priority::High,
            _ => Priority::Medium,
        }
    }
}

/// Task lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    OnHold,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::OnHold => "on_hold",
        }
    }

    /// Parse a stored status key, defaulting to pending
    pub fn from_key(key: &str) -> Self {
        match key {
            "in_progress" => TaskStatus::InProgress,
            "completed" => TaskStatus::Completed,
            "on_hold" => TaskStatus::OnHold,
            _ => TaskStatus::Pending,
        }
    }
}

/// An expense record.
///
/// Expense ID format: "expense::<epoch_millis>". The category is stored as a
/// free string; unknown values are preserved and displayed with a fallback
/// label rather than dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub farm_id: String,
    pub category: String,
    /// Positive amount in the operator's currency
    pub amount: f64,
    /// ISO 8601 date (YYYY-MM-DD)
    pub date: String,
    pub description: String,
}

/// An income record.
///
/// Income ID format: "income::<epoch_millis>". Farm and crop links are
/// optional; dangling links resolve to placeholder labels at display time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: String,
    pub description: String,
    /// Positive amount in the operator's currency
    pub amount: f64,
    /// ISO 8601 date (YYYY-MM-DD)
    pub date: String,
    pub source: String,
    pub crop_id: Option<String>,
    pub farm_id: Option<String>,
    pub notes: String,
}

/// A known category (or income source) with its display label and chart color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDef {
    pub key: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

/// Known expense categories, in display order
pub const EXPENSE_CATEGORIES: &[CategoryDef] = &[
    CategoryDef { key: "seeds", label: "Seeds", color: "#8bc34a" },
    CategoryDef { key: "equipment", label: "Equipment", color: "#607d8b" },
    CategoryDef { key: "fertilizer", label: "Fertilizer", color: "#795548" },
    CategoryDef { key: "labor", label: "Labor", color: "#ff9800" },
    CategoryDef { key: "fuel", label: "Fuel", color: "#f44336" },
    CategoryDef { key: "maintenance", label: "Maintenance", color: "#3f51b5" },
    CategoryDef { key: "other", label: "Other", color: "#9e9e9e" },
];

/// Known income sources, in display order
pub const INCOME_SOURCES: &[CategoryDef] = &[
    CategoryDef { key: "crop_sales", label: "Crop Sales", color: "#4caf50" },
    CategoryDef { key: "direct_sales", label: "Direct Sales", color: "#009688" },
    CategoryDef { key: "contracts", label: "Contracts", color: "#2196f3" },
    CategoryDef { key: "subsidies", label: "Subsidies", color: "#673ab7" },
    CategoryDef { key: "insurance", label: "Insurance", color: "#e91e63" },
    CategoryDef { key: "grants", label: "Grants", color: "#ffc107" },
    CategoryDef { key: "other", label: "Other", color: "#9e9e9e" },
];

/// Color used for categories outside the known set
pub const FALLBACK_COLOR: &str = "#9e9e9e";

/// Display label for a category key, falling back to a title-cased rendering
/// of the raw key when it is not in the known set
pub fn category_label(defs: &[CategoryDef], key: &str) -> String {
    defs.iter()
        .find(|d| d.key == key)
        .map(|d| d.label.to_string())
        .unwrap_or_else(|| title_case(key))
}

/// Chart color for a category key
pub fn category_color(defs: &[CategoryDef], key: &str) -> &'static str {
    defs.iter()
        .find(|d| d.key == key)
        .map(|d| d.color)
        .unwrap_or(FALLBACK_COLOR)
}

/// Title-case a snake_case or camelCase key: "crop_sales" -> "Crop Sales",
/// "expectedHarvestDate" -> "Expected Harvest Date"
pub fn title_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut start_of_word = true;
    for c in key.chars() {
        if c == '_' || c == ' ' || c == '-' {
            if !out.ends_with(' ') && !out.is_empty() {
                out.push(' ');
            }
            start_of_word = true;
        } else if c.is_uppercase() {
            if !start_of_word && !out.ends_with(' ') {
                out.push(' ');
            }
            out.push(c);
            start_of_word = false;
        } else if start_of_word {
            out.extend(c.to_uppercase());
            start_of_word = false;
        } else {
            out.push(c);
        }
    }
    out.trim().to_string()
}

/// Generate an entity ID of the form "<prefix>::<epoch_millis>"
pub fn generate_entity_id(prefix: &str, epoch_millis: u64) -> String {
    format!("{}::{}", prefix, epoch_millis)
}

/// Parse an entity ID, returning its creation timestamp
pub fn parse_entity_id(id: &str, prefix: &str) -> Result<u64, EntityIdError> {
    let parts: Vec<&str> = id.split("::").collect();
    if parts.len() != 2 || parts[0] != prefix {
        return Err(EntityIdError::InvalidFormat);
    }
    parts[1]
        .parse::<u64>()
        .map_err(|_| EntityIdError::InvalidTimestamp)
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntityIdError {
    InvalidFormat,
    InvalidTimestamp,
}

impl fmt::Display for EntityIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityIdError::InvalidFormat => write!(f, "Invalid entity ID format"),
            EntityIdError::InvalidTimestamp => write!(f, "Invalid timestamp in entity ID"),
        }
    }
}

impl std::error::Error for EntityIdError {}

impl Farm {
    pub fn generate_id(epoch_millis: u64) -> String {
        generate_entity_id("farm", epoch_millis)
    }

    pub fn extract_timestamp(&self) -> Result<u64, EntityIdError> {
        parse_entity_id(&self.id, "farm")
    }
}

impl Crop {
    pub fn generate_id(epoch_millis: u64) -> String {
        generate_entity_id("crop", epoch_millis)
    }

    pub fn extract_timestamp(&self) -> Result<u64, EntityIdError> {
        parse_entity_id(&self.id, "crop")
    }
}

impl Task {
    pub fn generate_id(epoch_millis: u64) -> String {
        generate_entity_id("task", epoch_millis)
    }

    pub fn extract_timestamp(&self) -> Result<u64, EntityIdError> {
        parse_entity_id(&self.id, "task")
    }
}

impl Expense {
    pub fn generate_id(epoch_millis: u64) -> String {
        generate_entity_id("expense", epoch_millis)
    }

    pub fn extract_timestamp(&self) -> Result<u64, EntityIdError> {
        parse_entity_id(&self.id, "expense")
    }
}

impl Income {
    pub fn generate_id(epoch_millis: u64) -> String {
        generate_entity_id("income", epoch_millis)
    }

    pub fn extract_timestamp(&self) -> Result<u64, EntityIdError> {
        parse_entity_id(&self.id, "income")
    }
}

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateFarmRequest {
    pub name: String,
    pub size: f64,
    pub size_unit: SizeUnit,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateFarmRequest {
    pub name: Option<String>,
    pub size: Option<f64>,
    pub size_unit: Option<SizeUnit>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateCropRequest {
    pub farm_id: String,
    pub name: String,
    pub variety: String,
    pub planting_date: String,
    pub expected_harvest_date: String,
    pub growth_stage: Option<String>,
    pub field: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateCropRequest {
    pub farm_id: Option<String>,
    pub name: Option<String>,
    pub variety: Option<String>,
    pub planting_date: Option<String>,
    pub expected_harvest_date: Option<String>,
    pub growth_stage: Option<String>,
    pub field: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateTaskRequest {
    pub farm_id: String,
    pub crop_id: Option<String>,
    pub task_type: String,
    pub description: String,
    pub due_date: String,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateTaskRequest {
    pub farm_id: Option<String>,
    pub crop_id: Option<String>,
    pub task_type: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateExpenseRequest {
    pub farm_id: String,
    pub category: String,
    pub amount: f64,
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateExpenseRequest {
    pub farm_id: Option<String>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateIncomeRequest {
    pub description: String,
    pub amount: f64,
    pub date: String,
    pub source: String,
    pub crop_id: Option<String>,
    pub farm_id: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateIncomeRequest {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub source: Option<String>,
    pub crop_id: Option<String>,
    pub farm_id: Option<String>,
    pub notes: Option<String>,
}

/// Response after deleting a record. Deleting an ID that does not exist is
/// not an error; it reports `deleted: false`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub success_message: String,
}

// ---------------------------------------------------------------------------
// Report / dashboard DTOs
// ---------------------------------------------------------------------------

/// Per-category aggregate for one breakdown bucket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotal {
    pub key: String,
    pub label: String,
    pub color: String,
    pub total: f64,
    pub count: usize,
}

/// Overall income/expense totals for a filtered period
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialTotals {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    /// Percentage; 0.0 when total income is 0
    pub profit_margin: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialSummaryResponse {
    pub totals: FinancialTotals,
    pub expense_breakdown: Vec<CategoryTotal>,
    pub income_breakdown: Vec<CategoryTotal>,
    pub expense_count: usize,
    pub income_count: usize,
}

/// One calendar-month aggregate bucket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyBucket {
    /// 1-12
    pub month: u32,
    pub total: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyReportResponse {
    pub year: i32,
    pub income: Vec<MonthlyBucket>,
    pub expenses: Vec<MonthlyBucket>,
}

/// A task joined with display names for its farm and crop links
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskView {
    pub task: Task,
    pub farm_name: String,
    pub crop_name: Option<String>,
}

/// A crop joined with its farm display name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropView {
    pub crop: Crop,
    pub farm_name: String,
    pub growth_stage_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardResponse {
    pub farm_count: usize,
    pub crop_count: usize,
    pub pending_task_count: usize,
    pub totals: FinancialTotals,
    pub upcoming_tasks: Vec<TaskView>,
    pub active_crops: Vec<CropView>,
}

// ---------------------------------------------------------------------------
// Weather advice DTOs
// ---------------------------------------------------------------------------

/// A point-in-time weather observation supplied by the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub humidity_percent: f64,
    pub precipitation_mm: f64,
    /// Free-text conditions, e.g. "light rain"
    pub conditions: String,
    /// ISO 8601 date the snapshot applies to; defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceSeverity {
    Info,
    Warning,
    Critical,
}

/// A single weather-derived advisory message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Advice {
    pub severity: AdviceSeverity,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdviceResponse {
    pub advice: Vec<Advice>,
}
