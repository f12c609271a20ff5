use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use futures::future::join_all;
use indicatif::ProgressBar;
use tracing::{info, warn};

use crate::{
    cities::{index_dir, search, CitySeries},
    cli::{create_progress_bar, AnnotateAction},
    offset::OffsetKind,
};

pub async fn annotate(action: &AnnotateAction) -> Result<()> {
    match action {
        AnnotateAction::Cities { dir, search: term } => list_cities(dir, term.as_deref()),
        AnnotateAction::Bubbles { file } => list_bubbles(file),
        AnnotateAction::Add {
            file,
            year,
            text,
            strategy,
        } => edit(file, |s| {
            let b = s.upsert_bubble(*year, text, strategy)?;
            println!(
                "Added {}: offset=({}, {})",
                b.year, b.offset_x, b.offset_y
            );
            Ok(())
        }),
        AnnotateAction::Update {
            file,
            year,
            text,
            strategy,
        } => edit(file, |s| {
            let b = s.update_bubble(*year, text, strategy)?;
            println!(
                "Updated {}: offset=({}, {})",
                b.year, b.offset_x, b.offset_y
            );
            Ok(())
        }),
        AnnotateAction::Delete { file, year } => edit(file, |s| {
            if !s.remove_bubble(*year) {
                return Err(anyhow!("no bubble for year {}", year));
            }
            println!("{} has been deleted", year);
            Ok(())
        }),
        AnnotateAction::Recompute { dir, strategy } => {
            let updated = recompute(dir, *strategy).await?;
            println!("Recomputed offsets in {} documents", updated);
            Ok(())
        }
    }
}

fn list_cities(dir: &Path, term: Option<&str>) -> Result<()> {
    let index = index_dir(dir).with_context(|| format!("reading {}", dir.display()))?;
    let entries: Vec<_> = match term {
        Some(term) => search(&index, term),
        None => index.iter().collect(),
    };

    if entries.is_empty() {
        println!("No matching city/country found");
    }
    for e in entries {
        println!("{}, {}\t{}", e.city, e.country, e.path.display());
    }

    Ok(())
}

fn list_bubbles(file: &Path) -> Result<()> {
    let series = CitySeries::load(file)?;

    println!("{}", series.label());
    for b in &series.bubbles {
        println!(
            "{} → {} ({}, {})",
            b.year,
            preview(&b.text, 30),
            b.offset_x,
            b.offset_y
        );
    }

    Ok(())
}

/// Loads a document, applies `f` and writes it back only if `f` succeeds.
fn edit<F>(file: &Path, f: F) -> Result<()>
where
    F: FnOnce(&mut CitySeries) -> Result<()>,
{
    let mut series =
        CitySeries::load(file).with_context(|| format!("reading {}", file.display()))?;
    f(&mut series)?;
    series.save(file)?;

    Ok(())
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}

/// Recomputes bubble offsets for every document in `dir`, one task per
/// document. Returns the number of documents rewritten.
pub async fn recompute(dir: &Path, strategy: OffsetKind) -> Result<usize> {
    let files: Vec<PathBuf> = index_dir(dir)?.into_iter().map(|e| e.path).collect();
    let pb = create_progress_bar(files.len() as u64, "Recomputing offsets".to_string());

    let tasks: Vec<_> = files
        .into_iter()
        .map(|file| {
            let pb = pb.clone();
            tokio::spawn(async move { recompute_file(&file, strategy, &pb) })
        })
        .collect();

    let mut updated = 0;
    for result in join_all(tasks).await {
        match result {
            Ok(Ok(true)) => updated += 1,
            Ok(Ok(false)) => {}
            Ok(Err(e)) => eprintln!("Error processing file: {:?}", e),
            Err(e) => eprintln!("Task join error: {:?}", e),
        }
    }
    pb.finish_with_message("Offsets recomputed");

    Ok(updated)
}

fn recompute_file(file: &Path, strategy: OffsetKind, pb: &ProgressBar) -> Result<bool> {
    let mut series = CitySeries::load(file)?;
    pb.inc(1);

    if series.bubbles.is_empty() {
        return Ok(false);
    }

    let missing = series.recompute_offsets(&strategy);
    for year in &missing {
        warn!(city = %series.label(), year, "No data for bubble year, offset kept");
    }
    series.save(file)?;
    info!(city = %series.label(), bubbles = series.bubbles.len(), "Offsets recomputed");

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cities::{Bubble, YearValue};
    use std::fs;
    use tempfile::TempDir;

    fn accra() -> CitySeries {
        CitySeries {
            city: "Accra".to_string(),
            country: "Ghana".to_string(),
            data: vec![
                YearValue {
                    year: 1920,
                    value: Some(70.0),
                },
                YearValue {
                    year: 2022,
                    value: Some(10.0),
                },
            ],
            bubbles: Vec::new(),
        }
    }

    #[test]
    fn should_truncate_preview() {
        assert_eq!(preview("short", 30), "short");
        assert_eq!(preview("ééééé", 3), "ééé...");
    }

    #[tokio::test]
    async fn should_edit_document_in_place() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("Accra_Ghana.json");
        accra().save(&file).unwrap();

        let add = AnnotateAction::Add {
            file: file.clone(),
            year: 1920,
            text: "Colonial port growth".to_string(),
            strategy: OffsetKind::Tiered,
        };
        annotate(&add).await.unwrap();

        let saved = CitySeries::load(&file).unwrap();
        assert_eq!(saved.bubbles.len(), 1);
        assert_eq!((saved.bubbles[0].offset_x, saved.bubbles[0].offset_y), (5, -25));

        let delete = AnnotateAction::Delete {
            file: file.clone(),
            year: 1920,
        };
        annotate(&delete).await.unwrap();
        assert!(CitySeries::load(&file).unwrap().bubbles.is_empty());
        assert!(annotate(&delete).await.is_err());
    }

    #[tokio::test]
    async fn should_leave_document_untouched_on_failure() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("Accra_Ghana.json");
        accra().save(&file).unwrap();
        let before = fs::read_to_string(&file).unwrap();

        let add = AnnotateAction::Add {
            file: file.clone(),
            year: 1999,
            text: "No data".to_string(),
            strategy: OffsetKind::Simple,
        };

        assert!(annotate(&add).await.is_err());
        assert_eq!(fs::read_to_string(&file).unwrap(), before);
    }

    #[tokio::test]
    async fn should_recompute_directory() {
        let dir = TempDir::new().unwrap();
        let mut with_bubble = accra();
        with_bubble.bubbles.push(Bubble {
            year: 2022,
            text: "Clean air".to_string(),
            offset_x: 0,
            offset_y: 0,
        });
        with_bubble.save(&dir.path().join("Accra_Ghana.json")).unwrap();
        CitySeries {
            city: "Lagos".to_string(),
            ..accra()
        }
        .save(&dir.path().join("Lagos_Ghana.json"))
        .unwrap();

        let updated = recompute(dir.path(), OffsetKind::Simple).await.unwrap();

        assert_eq!(updated, 1);
        let saved = CitySeries::load(&dir.path().join("Accra_Ghana.json")).unwrap();
        assert_eq!((saved.bubbles[0].offset_x, saved.bubbles[0].offset_y), (-20, 10));
    }
}
