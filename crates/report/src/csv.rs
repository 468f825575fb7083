//! Plain CSV tables: one header line, comma-separated rows, no quoting.
//!
//! Writers take any `Write` so they can be pointed at a buffer in tests;
//! [`to_file`] adds buffering and path context.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use quantum::EvolutionTrace;
use tracing::debug;

use crate::error::{ReportError, ReportResult};
use crate::rows::{CloudRow, FrontierRow, GapSweepRow, HoldingRow};

/// Create `path` and run `write` against a buffered handle to it.
pub fn to_file<F>(path: &Path, write: F) -> ReportResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let wrap = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut out = BufWriter::new(File::create(path).map_err(wrap)?);
    write(&mut out).map_err(wrap)?;
    out.flush().map_err(wrap)?;
    debug!(path = %path.display(), "wrote csv");
    Ok(())
}

/// Two-column curve such as `s,gap`.
pub fn write_curve<W: Write>(w: &mut W, columns: [&str; 2], rows: &[(f64, f64)]) -> io::Result<()> {
    writeln!(w, "{},{}", columns[0], columns[1])?;
    for (x, y) in rows {
        writeln!(w, "{},{}", x, y)?;
    }
    Ok(())
}

/// `s,e0,e1,...`; rows with fewer levels leave trailing cells empty.
pub fn write_eigenvalues<W: Write>(w: &mut W, rows: &[(f64, Vec<f64>)]) -> io::Result<()> {
    let width = rows.iter().map(|(_, e)| e.len()).max().unwrap_or(0);
    write!(w, "s")?;
    for k in 0..width {
        write!(w, ",e{}", k)?;
    }
    writeln!(w)?;
    for (s, levels) in rows {
        write!(w, "{}", s)?;
        for k in 0..width {
            match levels.get(k) {
                Some(e) => write!(w, ",{}", e)?,
                None => write!(w, ",")?,
            }
        }
        writeln!(w)?;
    }
    Ok(())
}

/// Full per-sample record of an evolution or spectrum-only run.
pub fn write_trace<W: Write>(w: &mut W, trace: &EvolutionTrace) -> io::Result<()> {
    writeln!(
        w,
        "s,time,ground_energy,gap,relative_gap,gap_class,ground_overlap,norm,dominant_state"
    )?;
    for p in trace.points() {
        writeln!(
            w,
            "{},{},{},{},{},{:?},{},{},{}",
            p.s,
            p.time,
            p.eigenvalues[0],
            p.gap,
            p.relative_gap,
            p.gap_class,
            optional(p.ground_overlap),
            optional(p.norm),
            p.dominant_state
        )?;
    }
    Ok(())
}

pub fn write_cloud<W: Write>(w: &mut W, rows: &[CloudRow]) -> io::Result<()> {
    writeln!(w, "rank,bits,energy,occurrences,first_trial")?;
    for r in rows {
        writeln!(w, "{},{},{},{},{}", r.rank, r.bits, r.energy, r.occurrences, r.first_trial)?;
    }
    Ok(())
}

/// One column of share counts per asset, then the financial metrics.
pub fn write_holdings<W: Write>(w: &mut W, asset_ids: &[&str], rows: &[HoldingRow]) -> io::Result<()> {
    write!(w, "rank,bits,occurrences")?;
    for id in asset_ids {
        write!(w, ",{}", id)?;
    }
    writeln!(w, ",expected_return,variance,spent,budget_residual,cost")?;
    for r in rows {
        write!(w, "{},{},{}", r.rank, r.bits, r.occurrences)?;
        for n in &r.metrics.shares {
            write!(w, ",{}", n)?;
        }
        let m = &r.metrics;
        writeln!(
            w,
            ",{},{},{},{},{}",
            m.expected_return, m.variance, m.spent, m.budget_residual, m.cost
        )?;
    }
    Ok(())
}

pub fn write_gap_sweep<W: Write>(w: &mut W, rows: &[GapSweepRow]) -> io::Result<()> {
    writeln!(w, "total_time,min_gap,min_gap_s,ground_overlap,found_ground_state")?;
    for r in rows {
        writeln!(
            w,
            "{},{},{},{},{}",
            r.total_time, r.min_gap, r.min_gap_s, r.ground_overlap, r.found_ground_state
        )?;
    }
    Ok(())
}

pub fn write_frontier<W: Write>(w: &mut W, asset_ids: &[&str], rows: &[FrontierRow]) -> io::Result<()> {
    write!(w, "risk_aversion,expected_return,variance,spent,best_energy,distinct_solutions")?;
    for id in asset_ids {
        write!(w, ",{}", id)?;
    }
    writeln!(w)?;
    for r in rows {
        let m = &r.metrics;
        write!(
            w,
            "{},{},{},{},{},{}",
            r.risk_aversion, m.expected_return, m.variance, m.spent, r.best_energy, r.distinct_solutions
        )?;
        for n in &m.shares {
            write!(w, ",{}", n)?;
        }
        writeln!(w)?;
    }
    Ok(())
}

fn optional(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}
