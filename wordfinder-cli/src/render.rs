use colored::Colorize;
use wordfinder::{Grid, RankedWord, SearchOutput};

/// Marks every cell covered by an occurrence of one of `words`, reading
/// along rows and down columns.
pub fn highlight_mask(grid: &Grid, words: &[RankedWord]) -> Vec<Vec<bool>> {
    let mut mask = vec![vec![false; grid.cols()]; grid.rows()];

    for ranked in words {
        let needle: Vec<char> = ranked.word.chars().collect();
        if needle.is_empty() {
            continue;
        }

        if needle.len() <= grid.cols() {
            for r in 0..grid.rows() {
                for (start, window) in grid.row(r).windows(needle.len()).enumerate() {
                    if window == needle.as_slice() {
                        mask[r][start..start + needle.len()].fill(true);
                    }
                }
            }
        }

        if needle.len() <= grid.rows() {
            for c in 0..grid.cols() {
                let column = grid.column(c);
                for (start, window) in column.windows(needle.len()).enumerate() {
                    if window == needle.as_slice() {
                        for row in &mut mask[start..start + needle.len()] {
                            row[c] = true;
                        }
                    }
                }
            }
        }
    }

    mask
}

/// Renders the grid with spaced cells, found cells upper-cased and coloured.
pub fn render_grid(grid: &Grid, words: &[RankedWord]) -> String {
    let mask = highlight_mask(grid, words);
    let mut out = String::new();

    for (r, marks) in mask.iter().enumerate() {
        let cells: Vec<String> = grid
            .row(r)
            .iter()
            .zip(marks)
            .map(|(&ch, &marked)| {
                if marked {
                    ch.to_uppercase().to_string().yellow().bold().to_string()
                } else {
                    ch.to_string()
                }
            })
            .collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }

    out
}

pub fn print_results(grid: &Grid, output: &SearchOutput, highlight: bool) {
    if highlight {
        println!("Grid with highlighted words:");
        print!("{}", render_grid(grid, &output.words));
        println!();
    }

    if output.cancelled {
        println!("{}", "Search was cancelled; results are partial.".yellow());
    }

    if output.words.is_empty() {
        println!("No words from the word stream were found in the grid.");
        return;
    }

    println!("Words found in the grid:");
    for ranked in &output.words {
        println!(
            "{} {}",
            ranked.word.green(),
            format!("({})", ranked.count).dimmed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(words: &[&str]) -> Vec<RankedWord> {
        words
            .iter()
            .map(|w| RankedWord {
                word: w.to_string(),
                count: 1,
            })
            .collect()
    }

    #[test]
    fn test_mask_rows_and_columns() {
        let grid = Grid::new(["abcd", "efgh", "ijkl"]).unwrap();
        let mask = highlight_mask(&grid, &ranked(&["bc", "dhl"]));

        assert_eq!(mask[0], vec![false, true, true, true]);
        assert_eq!(mask[1], vec![false, false, false, true]);
        assert_eq!(mask[2], vec![false, false, false, true]);
    }

    #[test]
    fn test_mask_ignores_words_longer_than_lines() {
        let grid = Grid::new(["ab", "cd"]).unwrap();
        let mask = highlight_mask(&grid, &ranked(&["abc"]));
        assert!(mask.iter().flatten().all(|&m| !m));
    }

    #[test]
    fn test_render_grid_uppercases_matches() {
        colored::control::set_override(false);
        let grid = Grid::new(["abcd", "efgh"]).unwrap();
        let rendered = render_grid(&grid, &ranked(&["fg"]));
        assert_eq!(rendered, "a b c d\ne F G h\n");
    }
}
