//! Columnar input: per-event jagged branches flattened into per-object scans.
//!
//! The analysis only needs a handful of `<prefix>_*` branches, each a
//! `std::vector<T>` per event; the matched pt may nest one level deeper.
//! [`ColumnSource`] hides where they come from so the pipeline can run on a
//! ROOT file or on in-memory columns.

use std::collections::HashMap;
use std::path::Path;

use oxyroot::{Branch, Named, ReaderTree, RootFile};
use tracing::debug;

use crate::core::layers::{self, ObjectKind, SplitMode};
use crate::error::{RadiusError, RadiusResult};

/// Read access to flattened columns by full branch name.
pub trait ColumnSource {
    fn has_column(&self, name: &str) -> bool;

    /// Floating-point column, events concatenated in order.
    fn float_column(&self, name: &str) -> RadiusResult<Vec<f64>>;

    /// Integer column, events concatenated in order.
    fn int_column(&self, name: &str) -> RadiusResult<Vec<i64>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RootItemKind {
    F32,
    F64,
    I32,
    I64,
}

/// Scalar kind of a `vector<T>` or `vector<vector<T>>` branch, with its nesting depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ItemType {
    kind: RootItemKind,
    depth: usize,
}

const MAX_VECTOR_DEPTH: usize = 2;

fn parse_item_type(type_name: &str) -> Option<ItemType> {
    let mut inner = type_name.trim().to_ascii_lowercase();
    let mut depth = 0;
    while let Some(rest) = inner
        .trim_start_matches("std::")
        .strip_prefix("vector<")
        .and_then(|rest| rest.strip_suffix('>'))
    {
        inner = rest.trim().to_string();
        depth += 1;
    }
    if depth == 0 || depth > MAX_VECTOR_DEPTH {
        return None;
    }
    let kind = match inner.as_str() {
        "float" | "float_t" => RootItemKind::F32,
        "double" | "double_t" => RootItemKind::F64,
        "int" | "int_t" | "int32_t" => RootItemKind::I32,
        "long" | "long64_t" | "int64_t" => RootItemKind::I64,
        _ => return None,
    };
    Some(ItemType { kind, depth })
}

fn map_root_error<E: std::fmt::Display>(name: &str, err: E) -> RadiusError {
    RadiusError::ReadColumn {
        name: name.to_string(),
        message: err.to_string(),
    }
}

/// A ROOT `TTree` opened with oxyroot.
pub struct RootNtuple {
    _file: RootFile,
    tree: ReaderTree,
}

impl RootNtuple {
    pub fn open(path: &Path, tree_name: &str) -> RadiusResult<Self> {
        let mut file = RootFile::open(path).map_err(|err| RadiusError::OpenInput {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let tree = file
            .get_tree(tree_name)
            .map_err(|err| RadiusError::OpenInput {
                path: path.to_path_buf(),
                message: format!("tree '{tree_name}': {err}"),
            })?;
        Ok(Self { _file: file, tree })
    }

    /// Names of branches starting with `prefix`.
    pub fn branch_names(&self, prefix: &str) -> Vec<String> {
        self.tree
            .branches()
            .map(|b| b.name().to_string())
            .filter(|name| name.starts_with(prefix))
            .collect()
    }

    fn typed_branch(&self, name: &str) -> RadiusResult<(&Branch, ItemType)> {
        let branch = self
            .tree
            .branch(name)
            .ok_or_else(|| RadiusError::MissingColumn(name.to_string()))?;
        let item = parse_item_type(&branch.item_type_name()).ok_or_else(|| {
            RadiusError::UnsupportedColumn {
                name: name.to_string(),
                type_name: branch.item_type_name(),
            }
        })?;
        Ok((branch, item))
    }
}

impl ColumnSource for RootNtuple {
    fn has_column(&self, name: &str) -> bool {
        self.tree.branch(name).is_some()
    }

    fn float_column(&self, name: &str) -> RadiusResult<Vec<f64>> {
        let (branch, item) = self.typed_branch(name)?;
        if item.depth == 2 {
            return nested_float_column(branch, name, item.kind);
        }
        let values = match item.kind {
            RootItemKind::F32 => branch
                .as_iter::<Vec<f32>>()
                .map_err(|err| map_root_error(name, err))?
                .flatten()
                .map(f64::from)
                .collect(),
            RootItemKind::F64 => branch
                .as_iter::<Vec<f64>>()
                .map_err(|err| map_root_error(name, err))?
                .flatten()
                .collect(),
            RootItemKind::I32 => branch
                .as_iter::<Vec<i32>>()
                .map_err(|err| map_root_error(name, err))?
                .flatten()
                .map(f64::from)
                .collect(),
            RootItemKind::I64 => branch
                .as_iter::<Vec<i64>>()
                .map_err(|err| map_root_error(name, err))?
                .flatten()
                .map(|v| v as f64)
                .collect(),
        };
        Ok(values)
    }

    fn int_column(&self, name: &str) -> RadiusResult<Vec<i64>> {
        let (branch, item) = self.typed_branch(name)?;
        if item.depth != 1 {
            return Err(RadiusError::UnsupportedColumn {
                name: name.to_string(),
                type_name: branch.item_type_name(),
            });
        }
        let values = match item.kind {
            RootItemKind::I32 => branch
                .as_iter::<Vec<i32>>()
                .map_err(|err| map_root_error(name, err))?
                .flatten()
                .map(i64::from)
                .collect(),
            RootItemKind::I64 => branch
                .as_iter::<Vec<i64>>()
                .map_err(|err| map_root_error(name, err))?
                .flatten()
                .collect(),
            RootItemKind::F32 | RootItemKind::F64 => {
                return Err(RadiusError::UnsupportedColumn {
                    name: name.to_string(),
                    type_name: branch.item_type_name(),
                });
            }
        };
        Ok(values)
    }
}

/// `vector<vector<T>>` branch: per event, per object, a list of values.
/// Both levels are flattened.
fn nested_float_column(branch: &Branch, name: &str, kind: RootItemKind) -> RadiusResult<Vec<f64>> {
    let values = match kind {
        RootItemKind::F32 => branch
            .as_iter::<Vec<Vec<f32>>>()
            .map_err(|err| map_root_error(name, err))?
            .flatten()
            .flatten()
            .map(f64::from)
            .collect(),
        RootItemKind::F64 => branch
            .as_iter::<Vec<Vec<f64>>>()
            .map_err(|err| map_root_error(name, err))?
            .flatten()
            .flatten()
            .collect(),
        RootItemKind::I32 | RootItemKind::I64 => {
            return Err(RadiusError::UnsupportedColumn {
                name: name.to_string(),
                type_name: branch.item_type_name(),
            });
        }
    };
    Ok(values)
}

/// Columns held in memory, already flattened.
#[derive(Debug, Clone, Default)]
pub struct MemoryColumns {
    floats: HashMap<String, Vec<f64>>,
    ints: HashMap<String, Vec<i64>>,
}

impl MemoryColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_floats(mut self, name: &str, values: Vec<f64>) -> Self {
        self.floats.insert(name.to_string(), values);
        self
    }

    /// Per-object lists, flattened the way a `vector<vector<T>>` branch is.
    pub fn with_nested_floats(self, name: &str, values: Vec<Vec<f64>>) -> Self {
        self.with_floats(name, values.into_iter().flatten().collect())
    }

    pub fn with_ints(mut self, name: &str, values: Vec<i64>) -> Self {
        self.ints.insert(name.to_string(), values);
        self
    }
}

impl ColumnSource for MemoryColumns {
    fn has_column(&self, name: &str) -> bool {
        self.floats.contains_key(name) || self.ints.contains_key(name)
    }

    fn float_column(&self, name: &str) -> RadiusResult<Vec<f64>> {
        if let Some(values) = self.floats.get(name) {
            return Ok(values.clone());
        }
        self.ints
            .get(name)
            .map(|values| values.iter().map(|&v| v as f64).collect())
            .ok_or_else(|| RadiusError::MissingColumn(name.to_string()))
    }

    fn int_column(&self, name: &str) -> RadiusResult<Vec<i64>> {
        self.ints
            .get(name)
            .cloned()
            .ok_or_else(|| RadiusError::MissingColumn(name.to_string()))
    }
}

/// Branch names for one object prefix (e.g. "t5").
#[derive(Debug, Clone)]
pub struct BranchNames {
    pub layer_binary: String,
    pub module_type_binary: String,
    pub inner_radius: String,
    pub bridge_radius: String,
    pub outer_radius: String,
    pub matched_pt: String,
    pub is_fake: String,
}

impl BranchNames {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            layer_binary: format!("{prefix}_layer_binary"),
            module_type_binary: format!("{prefix}_moduleType_binary"),
            inner_radius: format!("{prefix}_innerRadius"),
            bridge_radius: format!("{prefix}_bridgeRadius"),
            outer_radius: format!("{prefix}_outerRadius"),
            matched_pt: format!("{prefix}_matched_pt"),
            is_fake: format!("{prefix}_isFake"),
        }
    }
}

/// Every reconstructed object in the file, one entry per object.
///
/// All scans share the same length and index.
#[derive(Debug, Clone, Default)]
pub struct T5Collection {
    pub prefix: String,
    pub layer_binary: Vec<u32>,
    pub module_type_binary: Option<Vec<u32>>,
    pub inner_radius: Vec<f64>,
    pub bridge_radius: Vec<f64>,
    pub outer_radius: Vec<f64>,
    pub matched_pt: Vec<f64>,
    pub is_matched: Vec<bool>,
}

impl T5Collection {
    /// Load and align the object columns for `prefix` from `source`.
    pub fn load<S: ColumnSource + ?Sized>(source: &S, prefix: &str) -> RadiusResult<Self> {
        let names = BranchNames::with_prefix(prefix);

        let layer_binary: Vec<u32> = source
            .int_column(&names.layer_binary)?
            .into_iter()
            .map(|v| v as u32)
            .collect();
        let n = layer_binary.len();

        let module_type_binary = if source.has_column(&names.module_type_binary) {
            let values = source.int_column(&names.module_type_binary)?;
            check_len(&names.module_type_binary, n, values.len())?;
            Some(values.into_iter().map(|v| v as u32).collect())
        } else {
            debug!("no {} column; module-type split unavailable", names.module_type_binary);
            None
        };

        let inner_radius = aligned_floats(source, &names.inner_radius, n)?;
        let bridge_radius = aligned_floats(source, &names.bridge_radius, n)?;
        let outer_radius = aligned_floats(source, &names.outer_radius, n)?;
        let matched_pt = aligned_floats(source, &names.matched_pt, n)?;

        let is_fake = source.int_column(&names.is_fake)?;
        check_len(&names.is_fake, n, is_fake.len())?;
        let is_matched = is_fake.into_iter().map(|fake| fake == 0).collect();

        debug!(objects = n, prefix, "loaded object collection");

        Ok(Self {
            prefix: prefix.to_string(),
            layer_binary,
            module_type_binary,
            inner_radius,
            bridge_radius,
            outer_radius,
            matched_pt,
            is_matched,
        })
    }

    pub fn len(&self) -> usize {
        self.layer_binary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layer_binary.is_empty()
    }

    /// One grouping label per object.
    pub fn labels(&self, mode: SplitMode, kind: ObjectKind) -> RadiusResult<Vec<String>> {
        match mode {
            SplitMode::BarrelEndcap => Ok(self
                .layer_binary
                .iter()
                .map(|&b| layers::layer_type(&layers::decode_layers(b)))
                .collect()),
            SplitMode::LayerNumbers => Ok(self
                .layer_binary
                .iter()
                .map(|&b| layers::layer_numbers(&layers::decode_layers(b)))
                .collect()),
            SplitMode::ModuleTypes => {
                let binaries = self.module_type_binary.as_ref().ok_or_else(|| {
                    RadiusError::MissingColumn(
                        BranchNames::with_prefix(&self.prefix).module_type_binary,
                    )
                })?;
                Ok(binaries
                    .iter()
                    .map(|&b| layers::module_type_label(&layers::decode_module_types(b, kind)))
                    .collect())
            }
        }
    }
}

fn aligned_floats<S: ColumnSource + ?Sized>(
    source: &S,
    name: &str,
    expected: usize,
) -> RadiusResult<Vec<f64>> {
    let values = source.float_column(name)?;
    check_len(name, expected, values.len())?;
    Ok(values)
}

fn check_len(name: &str, expected: usize, got: usize) -> RadiusResult<()> {
    if expected != got {
        return Err(RadiusError::LengthMismatch {
            name: name.to_string(),
            expected,
            got,
        });
    }
    Ok(())
}
