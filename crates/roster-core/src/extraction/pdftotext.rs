use crate::error::RosterError;
use crate::extraction::{BBox, Fragment, PageContent, PdfExtractor, TextLine};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::Write;
use std::path::Path;
use std::process::Command;

/// Words on one layout line further apart than this many line heights are
/// treated as belonging to different table columns.
pub const DEFAULT_COLUMN_GAP_FACTOR: f32 = 1.5;

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Lines come from `pdftotext -raw` (content-stream order, one table cell per
/// line for most generators). Fragments come from `pdftotext -bbox-layout`,
/// with each layout line cut into runs wherever the horizontal gap between
/// two words is wider than `column_gap_factor` line heights.
pub struct PdftotextExtractor {
    column_gap_factor: f32,
}

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor {
            column_gap_factor: DEFAULT_COLUMN_GAP_FACTOR,
        }
    }

    pub fn with_column_gap_factor(column_gap_factor: f32) -> Self {
        PdftotextExtractor { column_gap_factor }
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, RosterError> {
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| RosterError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| RosterError::Extraction(e.to_string()))?;
        let tmp_path = tmpfile.path().to_path_buf();

        let text = run_pdftotext(&tmp_path, "-raw")?;
        let xml = run_pdftotext(&tmp_path, "-bbox-layout")?;
        let mut fragments_by_page = parse_bbox_layout(&xml, self.column_gap_factor)?;

        // pdftotext separates pages with a form feed
        let pages: Vec<PageContent> = text
            .split('\x0c')
            .enumerate()
            .map(|(i, page_text)| {
                let page_number = i + 1;
                let lines = page_text
                    .lines()
                    .enumerate()
                    .map(|(line_index, raw)| TextLine::from_raw(page_number, line_index, raw))
                    .collect();
                let fragments = fragments_by_page
                    .get_mut(i)
                    .map(std::mem::take)
                    .unwrap_or_default();
                PageContent {
                    page_number,
                    lines,
                    fragments,
                }
            })
            .filter(|p| !p.lines.is_empty() || !p.fragments.is_empty() || p.page_number == 1)
            .collect();

        log::debug!(
            "pdftotext produced {} page(s), {} fragment(s)",
            pages.len(),
            pages.iter().map(|p| p.fragments.len()).sum::<usize>()
        );

        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

fn run_pdftotext(pdf_path: &Path, flag: &str) -> Result<String, RosterError> {
    let output = Command::new("pdftotext")
        .arg(flag)
        .arg("-enc")
        .arg("UTF-8")
        .arg(pdf_path)
        .arg("-") // output to stdout
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RosterError::PdftotextNotFound
            } else {
                RosterError::Extraction(format!("pdftotext {} failed: {}", flag, e))
            }
        })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(RosterError::PdftotextFailed { code, stderr });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

#[derive(Debug, Clone)]
struct Word {
    text: String,
    bbox: BBox,
}

/// Parse `pdftotext -bbox-layout` XHTML into fragments, one Vec per page.
fn parse_bbox_layout(xml: &str, gap_factor: f32) -> Result<Vec<Vec<Fragment>>, RosterError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pages: Vec<Vec<Fragment>> = Vec::new();
    let mut line_words: Vec<Word> = Vec::new();
    let mut word_bbox: Option<BBox> = None;
    let mut word_text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"page" => pages.push(Vec::new()),
                b"line" => line_words.clear(),
                b"word" => {
                    word_bbox = parse_bbox(&e)?;
                    word_text.clear();
                }
                _ => {}
            },
            Event::Text(t) if word_bbox.is_some() => {
                word_text.push_str(&t.unescape()?);
            }
            Event::End(e) => match e.name().as_ref() {
                b"word" => {
                    if let Some(bbox) = word_bbox.take() {
                        let text = word_text.trim();
                        if !text.is_empty() {
                            line_words.push(Word {
                                text: text.to_string(),
                                bbox,
                            });
                        }
                    }
                }
                b"line" => {
                    let page_number = pages.len();
                    if let Some(page) = pages.last_mut() {
                        page.extend(split_line(page_number, &line_words, gap_factor));
                    }
                    line_words.clear();
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(pages)
}

/// Cut one layout line into fragments at column-sized gaps.
fn split_line(page_number: usize, words: &[Word], gap_factor: f32) -> Vec<Fragment> {
    let mut out = Vec::new();
    let mut current: Vec<&Word> = Vec::new();

    for word in words {
        if let Some(prev) = current.last() {
            let gap = word.bbox.x_min - prev.bbox.x_max;
            let height = prev.bbox.height().max(word.bbox.height()).max(1.0);
            if gap > height * gap_factor {
                out.push(join_words(page_number, &current));
                current.clear();
            }
        }
        current.push(word);
    }
    if !current.is_empty() {
        out.push(join_words(page_number, &current));
    }

    out
}

fn join_words(page_number: usize, words: &[&Word]) -> Fragment {
    let text = words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let bbox = words.iter().skip(1).fold(words[0].bbox, |acc, w| BBox {
        x_min: acc.x_min.min(w.bbox.x_min),
        y_min: acc.y_min.min(w.bbox.y_min),
        x_max: acc.x_max.max(w.bbox.x_max),
        y_max: acc.y_max.max(w.bbox.y_max),
    });
    Fragment {
        page_number,
        text,
        font_size: bbox.height(),
        bbox,
    }
}

fn parse_bbox(tag: &BytesStart<'_>) -> Result<Option<BBox>, RosterError> {
    let mut coords = [None; 4];
    for attr in tag.attributes() {
        let attr = attr.map_err(|e| RosterError::Xml(e.to_string()))?;
        let slot = match attr.key.as_ref() {
            b"xMin" => 0,
            b"yMin" => 1,
            b"xMax" => 2,
            b"yMax" => 3,
            _ => continue,
        };
        coords[slot] = attr.unescape_value()?.parse::<f32>().ok();
    }
    Ok(match coords {
        [Some(x_min), Some(y_min), Some(x_max), Some(y_max)] => Some(BBox {
            x_min,
            y_min,
            x_max,
            y_max,
        }),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BBOX_XML: &str = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">
<html xmlns="http://www.w3.org/1999/xhtml">
<head>
<title></title>
<meta name="Producer" content="LibreOffice"/>
</head>
<body>
<doc>
  <page width="842.000000" height="595.000000">
    <flow>
      <block xMin="20.0" yMin="100.0" xMax="400.0" yMax="110.0">
        <line xMin="20.0" yMin="100.0" xMax="400.0" yMax="110.0">
          <word xMin="20.0" yMin="100.0" xMax="60.0" yMax="110.0">OFICIAL</word>
          <word xMin="63.0" yMin="100.0" xMax="73.0" yMax="110.0">DE</word>
          <word xMin="76.0" yMin="100.0" xMax="96.0" yMax="110.0">DIA</word>
          <word xMin="150.0" yMin="100.0" xMax="180.0" yMax="110.0">1ºTEN</word>
          <word xMin="183.0" yMin="100.0" xMax="215.0" yMax="110.0">ROSA</word>
          <word xMin="300.0" yMin="100.0" xMax="315.0" yMax="110.0">CB</word>
          <word xMin="318.0" yMin="100.0" xMax="350.0" yMax="110.0">D&apos;AVILA</word>
        </line>
      </block>
    </flow>
  </page>
  <page width="842.000000" height="595.000000">
    <flow>
      <block xMin="20.0" yMin="50.0" xMax="60.0" yMax="60.0">
        <line xMin="20.0" yMin="50.0" xMax="60.0" yMax="60.0">
          <word xMin="20.0" yMin="50.0" xMax="60.0" yMax="60.0">DATA</word>
        </line>
      </block>
    </flow>
  </page>
</doc>
</body>
</html>"#;

    #[test]
    fn test_parse_bbox_layout_splits_columns() {
        let pages = parse_bbox_layout(BBOX_XML, DEFAULT_COLUMN_GAP_FACTOR).unwrap();
        assert_eq!(pages.len(), 2);

        let first = &pages[0];
        assert_eq!(first.len(), 3);
        assert_eq!(first[0].text, "OFICIAL DE DIA");
        assert_eq!(first[0].x(), 20.0);
        assert_eq!(first[1].text, "1ºTEN ROSA");
        assert_eq!(first[1].x(), 150.0);
        assert_eq!(first[2].text, "CB D'AVILA");
        assert_eq!(first[2].page_number, 1);

        assert_eq!(pages[1][0].text, "DATA");
        assert_eq!(pages[1][0].page_number, 2);
    }

    #[test]
    fn test_split_line_keeps_close_words_together() {
        let words = vec![
            Word {
                text: "CMT".into(),
                bbox: BBox {
                    x_min: 10.0,
                    y_min: 0.0,
                    x_max: 30.0,
                    y_max: 10.0,
                },
            },
            Word {
                text: "GDA".into(),
                bbox: BBox {
                    x_min: 33.0,
                    y_min: 0.0,
                    x_max: 55.0,
                    y_max: 10.0,
                },
            },
        ];
        let fragments = split_line(1, &words, DEFAULT_COLUMN_GAP_FACTOR);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text, "CMT GDA");
        assert_eq!(fragments[0].bbox.x_max, 55.0);
    }
}
