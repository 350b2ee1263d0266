//! Application constants for the BOM structure converter
//!
//! Column names of the engineering spreadsheet, the record layouts expected by
//! the NEO importer, output file naming and validation thresholds.

// =============================================================================
// Source Spreadsheet Columns
// =============================================================================

/// Dotted hierarchy position (`1`, `1.0`, `1.1.2`)
pub const COLUMN_POSITION: &str = "ITEM";

/// Quantity of the component under its parent
pub const COLUMN_QUANTITY: &str = "QTD";

/// Drawing number, the source of the component code
pub const COLUMN_DRAWING_NUMBER: &str = "N° DESENHO";

/// Raw material reference
pub const COLUMN_MATERIAL_CODE: &str = "CODIGO MP20";

/// Columns every input table must carry
pub const REQUIRED_COLUMNS: &[&str] = &[
    COLUMN_POSITION,
    COLUMN_QUANTITY,
    COLUMN_DRAWING_NUMBER,
    COLUMN_MATERIAL_CODE,
];

/// Normalized header of the description column, with its positional fallback (column C)
pub const DESCRIPTION_HEADER_KEYS: &[&str] = &["descricao", "desc"];
pub const DESCRIPTION_FALLBACK_INDEX: usize = 2;

/// Normalized header of the weight column, with its positional fallback (column H)
pub const WEIGHT_HEADER_KEYS: &[&str] = &["peso"];
pub const WEIGHT_FALLBACK_INDEX: usize = 7;

/// Normalized header of the optional material type column
pub const MATERIAL_TYPE_HEADER_KEYS: &[&str] = &["tipomp", "tipo"];

/// Offset between a 0-based data row index and the spreadsheet line number
pub const HEADER_LINE_OFFSET: usize = 2;

// =============================================================================
// Component Codes
// =============================================================================

/// Prefix stripped from drawing numbers (`OLG12-06-1001` -> `G12061001`)
pub const DRAWING_PREFIX: &str = "OL";

/// Marker that excludes a drawing number from every conversion
pub const CARET_MARKER: char = '^';

/// Leading letter of purchased (OLZ) parts once the prefix is stripped
pub const PURCHASED_PART_PREFIX: char = 'Z';

/// Raw material prefix for hoses, measured in metres instead of kilograms
pub const HOSE_MATERIAL_PREFIX: &str = "Z20";

// =============================================================================
// NEO Import Layouts
// =============================================================================

/// Company column value for every NEO record
pub const COMPANY_CODE: &str = "001";

/// Loss percentage column value for every NEO record
pub const LOSS_CONSTANT: &str = "0";

pub const STRUCTURE_HEADERS: &[&str] = &["EMP", "MTG", "COD", "QTD", "PER"];
pub const MATERIAL_HEADERS: &[&str] = &["EMP", "COD", "MAP", "PES", "PER"];
pub const DESCRIPTION_HEADERS: &[&str] = &["Codigo", "Descricao"];
pub const PARTS_HEADERS: &[&str] = &[
    "Codigo",
    "Descricao",
    "Prop3",
    "Prop4",
    "Prop107",
    "Prop108",
    "Prop16",
    "Prop3_2",
    "PropS",
    "Peso",
];
pub const MISSING_OLZ_HEADERS: &[&str] = &["Codigo", "Descricao", "Desenho_Original", "Status"];

/// Fixed property columns of a parts registration record
pub const PARTS_PROPERTIES: &[&str] = &["3", "4", "107", "108", "16", "3", "S"];

/// Status written for purchased parts absent from the reference list
pub const STATUS_NOT_REGISTERED: &str = "NÃO CADASTRADO";

/// Audit report columns, mirroring the source spreadsheet
pub const REPORT_HEADERS: &[&str] = &[
    "MOTIVO",
    "LINHA_XLSX",
    "ITEM",
    "QTD",
    "N° DESENHO",
    "CODIGO MP20",
];

// =============================================================================
// Output File Names
// =============================================================================

pub const STRUCTURE_FILE_PREFIX: &str = "ESTRUTURA_";
pub const STRUCTURE_DIR_PREFIX: &str = "ESTRUTURA ";
pub const REPORT_FILE_PREFIX: &str = "RELATORIO_REMOVIDOS_";
pub const PARTS_FILE_STEM: &str = "CADASTRO DE PEÇAS";
pub const DESCRIPTIONS_FILE_STEM: &str = "ATUALIZAÇÃO DE DESCRIÇÕES";
pub const MATERIALS_FILE_STEM: &str = "ATUALIZAÇÃO DE MATÉRIA PRIMA";
pub const OLZ_FILE_STEM: &str = "OLZ FALTANTES";
pub const COMPLETE_DIR_PREFIX: &str = "CADASTRO COMPLETO ";

// =============================================================================
// Defaults and Thresholds
// =============================================================================

pub mod defaults {
    /// File extensions accepted as input tables
    pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xls", "csv"];

    /// Separator of CSV input and of every generated file
    pub const SEPARATOR: u8 = b';';

    /// Input files above this size only produce a warning
    pub const MAX_FILE_SIZE_MB: u64 = 100;

    /// Tables above this many rows only produce a warning
    pub const LARGE_TABLE_ROWS: usize = 10_000;

    /// Tables above this many rows are refused
    pub const MAX_TABLE_ROWS: usize = 1_000_000;

    /// Hierarchy depth above which a position is flagged as anomalous
    pub const MAX_EXPECTED_DEPTH: usize = 10;

    /// Normalized codes longer than this are flagged
    pub const MAX_CODE_LENGTH: usize = 50;

    /// Registration fields longer than this are flagged
    pub const MAX_FIELD_LENGTH: usize = 100;

    /// Descriptions longer than this are flagged
    pub const MAX_DESCRIPTION_LENGTH: usize = 80;

    /// Assembly codes longer than this are flagged
    pub const MAX_ASSEMBLY_CODE_LENGTH: usize = 50;

    /// Weight written when a registration row has none
    pub const DEFAULT_PART_WEIGHT: &str = "0";

    /// Hose length written when the description carries no `mm` value
    pub const DEFAULT_HOSE_LENGTH: &str = "1,00";

    /// Weight written when no usable weight could be read
    pub const DEFAULT_MATERIAL_WEIGHT: &str = "0,50";

    /// Weight written for an empty weight cell
    pub const EMPTY_MATERIAL_WEIGHT: &str = "0,00";
}
