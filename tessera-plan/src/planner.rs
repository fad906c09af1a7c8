//! Filter grouping, partition enumeration, and row-key range derivation.

use rustc_hash::FxHashMap;
use tessera_catalog::RichProjection;
use tessera_expr::{Filter, Operator};
use tessera_record::BinaryRecord;
use tessera_result::{Error, Result};
use tessera_types::KeyValue;
use tracing::{debug, info};

use crate::config::PlannerConfig;
use crate::plan::{ChunkScanMethod, PartitionPredicate, PartitionScanPlan, ScanPlan};

/// Compile a flat conjunctive filter list into a scan plan.
///
/// Partition-key pushdown first: when every partition column carries an
/// equality or set-membership filter, the Cartesian product of the value
/// sets (in declared column order) becomes an explicit partition list,
/// capped by `config.inquery_partitions_limit`. Otherwise the plan falls
/// back to a filtered full scan carrying the residual predicate.
///
/// Row-key pushdown is independent: a complete equality prefix with an
/// optional bounded range on its last position yields a
/// [`ChunkScanMethod::RowKeyRange`]; any other shape degrades to
/// [`ChunkScanMethod::All`] with a logged diagnostic.
pub fn compile(
    filters: &[Filter],
    projection: &RichProjection,
    config: &PlannerConfig,
) -> Result<ScanPlan> {
    config.validate()?;
    let by_column = group_by_column(filters);
    let chunks = compile_chunk_scan(&by_column, projection)?;
    let partitions = compile_partition_scan(&by_column, projection, config)?;
    Ok(ScanPlan { partitions, chunks })
}

fn group_by_column<'f>(filters: &'f [Filter]) -> FxHashMap<&'f str, Vec<&'f Operator>> {
    let mut by_column: FxHashMap<&str, Vec<&Operator>> = FxHashMap::default();
    for filter in filters {
        by_column
            .entry(filter.column.as_str())
            .or_default()
            .push(&filter.op);
    }
    by_column
}

/// Parsed filters of one partition column: the value list of each filter,
/// already coerced to the column's key type.
struct PartitionColumnFilters {
    position: usize,
    per_filter_values: Vec<Vec<KeyValue>>,
}

impl PartitionColumnFilters {
    /// Values satisfying *all* filters on this column.
    fn enumeration_set(&self) -> Vec<KeyValue> {
        let mut iter = self.per_filter_values.iter();
        let Some(first) = iter.next() else {
            return Vec::new();
        };
        let mut set = first.clone();
        for values in iter {
            set.retain(|v| values.contains(v));
        }
        set
    }
}

fn compile_partition_scan(
    by_column: &FxHashMap<&str, Vec<&Operator>>,
    projection: &RichProjection,
    config: &PlannerConfig,
) -> Result<PartitionScanPlan> {
    let mut filtered_columns: Vec<PartitionColumnFilters> = Vec::new();
    for (position, col) in projection.partition_columns().iter().enumerate() {
        let Some(ops) = by_column.get(col.name.as_str()) else {
            continue;
        };
        let mut per_filter_values = Vec::with_capacity(ops.len());
        for op in ops {
            let values = match op {
                Operator::Eq(v) => vec![col.col_type.parse_single(v)?],
                Operator::In(vs) => col.col_type.parse_values(vs)?,
                other => {
                    return Err(Error::UnsupportedFilter(format!(
                        "{} {} on partition column",
                        col.name,
                        other.name()
                    )));
                }
            };
            per_filter_values.push(values);
        }
        filtered_columns.push(PartitionColumnFilters {
            position,
            per_filter_values,
        });
    }

    // Enumerate concrete partitions only when every partition column is
    // constrained.
    if filtered_columns.len() == projection.partition_columns().len() {
        let sets: Vec<Vec<KeyValue>> = filtered_columns
            .iter()
            .map(PartitionColumnFilters::enumeration_set)
            .collect();
        match bounded_cartesian(&sets, config.inquery_partitions_limit) {
            Some(combos) => {
                let mut keys = Vec::with_capacity(combos.len());
                for combo in combos {
                    keys.push(BinaryRecord::encode(projection.partition_schema(), &combo)?);
                }
                return Ok(if keys.len() == 1 {
                    PartitionScanPlan::Single(keys.pop().expect("len checked"))
                } else {
                    PartitionScanPlan::Multi(keys)
                });
            }
            None => {
                debug!(
                    limit = config.inquery_partitions_limit,
                    "partition combinations exceed the in-query limit; \
                     degrading to a filtered scan"
                );
            }
        }
    }

    if filtered_columns.is_empty() {
        info!("no pushable partition predicates; scan is unfiltered");
        return Ok(PartitionScanPlan::Filtered(PartitionPredicate::match_all()));
    }

    // Residual predicate: AND across filters, membership per filter.
    let predicate = PartitionPredicate::new(move |key: &BinaryRecord| {
        filtered_columns.iter().all(|col| {
            let Ok(value) = key.field(col.position) else {
                return false;
            };
            col.per_filter_values
                .iter()
                .all(|values| values.contains(&value))
        })
    });
    Ok(PartitionScanPlan::Filtered(predicate))
}

/// Cartesian product of `sets` in declared column order, abandoned as soon
/// as it would exceed `limit`. Returns `None` above the limit.
fn bounded_cartesian(sets: &[Vec<KeyValue>], limit: usize) -> Option<Vec<Vec<KeyValue>>> {
    if sets.iter().any(Vec::is_empty) {
        return Some(Vec::new());
    }
    let mut combos: Vec<Vec<KeyValue>> = Vec::new();
    let mut odometer = vec![0usize; sets.len()];
    loop {
        if combos.len() == limit {
            // The next combination would exceed the cap; stop enumerating
            // rather than materializing the full product.
            return None;
        }
        combos.push(
            odometer
                .iter()
                .zip(sets)
                .map(|(&i, set)| set[i].clone())
                .collect(),
        );
        // Advance the rightmost position first so combinations come out
        // in declared-column-major order.
        let mut pos = sets.len();
        loop {
            if pos == 0 {
                return Some(combos);
            }
            pos -= 1;
            odometer[pos] += 1;
            if odometer[pos] < sets[pos].len() {
                break;
            }
            odometer[pos] = 0;
        }
    }
}

fn compile_chunk_scan(
    by_column: &FxHashMap<&str, Vec<&Operator>>,
    projection: &RichProjection,
) -> Result<ChunkScanMethod> {
    let row_key_columns = projection.row_key_columns();
    let mut positions: Vec<usize> = row_key_columns
        .iter()
        .enumerate()
        .filter(|(_, col)| by_column.contains_key(col.name.as_str()))
        .map(|(i, _)| i)
        .collect();
    if positions.is_empty() {
        return Ok(ChunkScanMethod::All);
    }
    positions.sort_unstable();
    let max_pos = *positions.last().expect("non-empty");
    if positions != (0..=max_pos).collect::<Vec<_>>() {
        info!(
            ?positions,
            "row-key filters do not form a column prefix; scanning all chunks"
        );
        return Ok(ChunkScanMethod::All);
    }

    let mut lows: Vec<KeyValue> = Vec::with_capacity(max_pos + 1);
    let mut highs: Vec<KeyValue> = Vec::with_capacity(max_pos + 1);
    for pos in 0..=max_pos {
        let col = &row_key_columns[pos];
        let ops = &by_column[col.name.as_str()];
        if pos < max_pos {
            // Inner prefix positions admit exactly one equality.
            match ops.as_slice() {
                [Operator::Eq(v)] => {
                    let v = col.col_type.parse_single(v)?;
                    lows.push(v.clone());
                    highs.push(v);
                }
                _ => {
                    info!(
                        column = %col.name,
                        "non-equality filter inside the row-key prefix; \
                         scanning all chunks"
                    );
                    return Ok(ChunkScanMethod::All);
                }
            }
        } else {
            match ops.as_slice() {
                [Operator::Eq(v)] => {
                    let v = col.col_type.parse_single(v)?;
                    lows.push(v.clone());
                    highs.push(v);
                }
                [a, b] if a.is_lower_bound() && b.is_upper_bound() => {
                    push_bounds(col, *a, *b, &mut lows, &mut highs)?;
                }
                [a, b] if b.is_lower_bound() && a.is_upper_bound() => {
                    push_bounds(col, *b, *a, &mut lows, &mut highs)?;
                }
                _ => {
                    info!(
                        column = %col.name,
                        "last row-key position is neither an equality nor a \
                         bounded range; scanning all chunks"
                    );
                    return Ok(ChunkScanMethod::All);
                }
            }
        }
    }

    let first = projection.row_key_prefix(&lows)?;
    let last = projection.row_key_prefix(&highs)?;
    Ok(ChunkScanMethod::RowKeyRange(first, last))
}

fn push_bounds(
    col: &tessera_catalog::ColumnDef,
    lower: &Operator,
    upper: &Operator,
    lows: &mut Vec<KeyValue>,
    highs: &mut Vec<KeyValue>,
) -> Result<()> {
    // Bound values are used inclusively: chunk pruning must stay
    // conservative, and exact open/closed filtering happens downstream at
    // row level.
    let (Operator::Gt(lo) | Operator::Gte(lo)) = lower else {
        return Err(Error::Internal("lower bound operator expected".into()));
    };
    let (Operator::Lt(hi) | Operator::Lte(hi)) = upper else {
        return Err(Error::Internal("upper bound operator expected".into()));
    };
    lows.push(col.col_type.parse_single(lo)?);
    highs.push(col.col_type.parse_single(hi)?);
    Ok(())
}
