use std::collections::HashSet;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::errors::{RegionSetError, Result};
use crate::models::Region;
use crate::utils::get_dynamic_reader;

///
/// RegionSet struct, the representation of an interval file such as a bed
/// file, a gtf file or a per-chromosome methylation file.
///
/// Regions are kept in file order; call [`RegionSet::sort`] if coordinate
/// order is needed.
///
#[derive(Clone, Debug, Default)]
pub struct RegionSet {
    pub regions: Vec<Region>,
    pub header: Option<String>,
    pub path: Option<PathBuf>,
}

pub struct RegionSetIterator<'a> {
    region_set: &'a RegionSet,
    index: usize,
}

/// How a single data line should be interpreted.
enum LineKind {
    Bed,
    Gtf,
    Header,
}

fn classify_line(parts: &[&str], first_line: bool) -> LineKind {
    // gtf: source column is text, start/end sit in columns 4 and 5
    if parts.len() >= 9
        && parts[1].parse::<u32>().is_err()
        && parts[3].parse::<u32>().is_ok()
        && parts[4].parse::<u32>().is_ok()
    {
        return LineKind::Gtf;
    }

    // column headers like `chr start end name` without a leading #
    if first_line && parts.len() >= 3 && parts[1].parse::<u32>().is_err() {
        return LineKind::Header;
    }

    LineKind::Bed
}

/// Attributes a gtf/gff region is named after, most preferred first.
const GTF_NAME_ATTRIBUTES: [&str; 6] = ["ID", "Name", "gene_name", "transcript_id", "gene_id", "Parent"];

///
/// Split a gtf (`key "value"`) or gff3 (`key=value`) attribute column into
/// key/value pairs.
///
fn gtf_attributes(attributes: &str) -> impl Iterator<Item = (&str, &str)> {
    attributes
        .split(';')
        .map(str::trim)
        .filter(|attr| !attr.is_empty())
        .filter_map(|attr| {
            let (key, value) = match attr.split_once('=') {
                Some(pair) => pair,
                None => attr.split_once(char::is_whitespace)?,
            };
            Some((key.trim(), value.trim().trim_matches('"')))
        })
}

///
/// Name of a gtf region: the first of [`GTF_NAME_ATTRIBUTES`] present with a
/// non-empty value.
///
fn gtf_name(attributes: &str) -> Option<&str> {
    let pairs: Vec<(&str, &str)> = gtf_attributes(attributes).collect();
    GTF_NAME_ATTRIBUTES.iter().find_map(|wanted| {
        pairs
            .iter()
            .find(|(key, value)| key == wanted && !value.is_empty())
            .map(|(_, value)| *value)
    })
}

fn parse_coord(value: &str, what: &str, line: &str) -> Result<u32> {
    value.parse::<u32>().map_err(|_| {
        RegionSetError::RegionParseError(format!("Error in parsing {} position: {:?}", what, line))
    })
}

fn parse_gtf_line(parts: &[&str], line: &str) -> Result<Region> {
    // gtf is 1-based, fully closed
    let start = parse_coord(parts[3], "start", line)?.saturating_sub(1);
    let end = parse_coord(parts[4], "end", line)?;
    let name = gtf_name(parts[8]).unwrap_or(parts[2]);

    Ok(Region {
        chr: parts[0].to_owned(),
        start,
        end,
        rest: Some(name.to_owned()),
    })
}

fn parse_bed_line(parts: &[&str], line: &str) -> Result<Region> {
    if parts.len() < 3 {
        return Err(RegionSetError::RegionParseError(format!(
            "Expected at least 3 columns: {:?}",
            line
        )));
    }

    Ok(Region {
        chr: parts[0].to_owned(),
        start: parse_coord(parts[1], "start", line)?,
        end: parse_coord(parts[2], "end", line)?,
        rest: Some(parts[3..].join("\t")).filter(|s| !s.is_empty()),
    })
}

impl RegionSet {
    ///
    /// Read a [RegionSet] from any buffered reader.
    ///
    /// Lines starting with `browser`, `track` or `#` are collected into the
    /// header, as is a first line whose start column is not a number.
    /// Blank lines are skipped. An input with no regions is not an error.
    ///
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut regions: Vec<Region> = Vec::new();
        let mut header: String = String::new();
        let mut first_line: bool = true;

        for line in reader.lines() {
            let line = line?;
            let line = line.trim_end_matches('\r');

            if line.trim().is_empty() {
                continue;
            }

            if line.starts_with("browser") | line.starts_with("track") | line.starts_with('#') {
                header.push_str(line);
                first_line = false;
                continue;
            }

            let parts: Vec<&str> = line.split('\t').collect();

            match classify_line(&parts, first_line) {
                LineKind::Header => header.push_str(line),
                LineKind::Gtf => regions.push(parse_gtf_line(&parts, line)?),
                LineKind::Bed => regions.push(parse_bed_line(&parts, line)?),
            }
            first_line = false;
        }

        Ok(RegionSet {
            regions,
            header: match header.is_empty() {
                true => None,
                false => Some(header),
            },
            path: None,
        })
    }

    ///
    /// Iterate unique chromosomes in the order they are first seen.
    ///
    pub fn iter_chroms(&self) -> impl Iterator<Item = &String> {
        let mut seen: HashSet<&String> = HashSet::new();
        self.regions
            .iter()
            .map(|r| &r.chr)
            .filter(move |chr| seen.insert(*chr))
    }

    ///
    /// Iterate through regions located on specific Chromosome in RegionSet
    ///
    /// # Arguments
    /// - chr: chromosome name
    ///
    pub fn iter_chr_regions<'a>(&'a self, chr: &'a str) -> impl Iterator<Item = &'a Region> {
        self.regions.iter().filter(move |r| r.chr == chr)
    }

    ///
    /// Is regionSet empty?
    ///
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    ///
    /// Get number of regions in RegionSet
    ///
    pub fn len(&self) -> usize {
        self.regions.len()
    }
}

impl TryFrom<&Path> for RegionSet {
    type Error = RegionSetError;

    ///
    /// Create a new [RegionSet] from a bed, gtf or bed.gz file.
    ///
    /// # Arguments:
    /// - value: path to the file on disk.
    fn try_from(value: &Path) -> Result<Self> {
        if !value.is_file() {
            return Err(RegionSetError::FileReadError(value.display().to_string()));
        }

        let reader = get_dynamic_reader(value)?;
        let mut rs = RegionSet::from_reader(reader)?;
        rs.path = Some(value.to_owned());

        Ok(rs)
    }
}

impl TryFrom<&str> for RegionSet {
    type Error = RegionSetError;

    fn try_from(value: &str) -> Result<Self> {
        RegionSet::try_from(Path::new(value))
    }
}

impl TryFrom<PathBuf> for RegionSet {
    type Error = RegionSetError;

    fn try_from(value: PathBuf) -> Result<Self> {
        RegionSet::try_from(value.as_path())
    }
}

impl TryFrom<&[u8]> for RegionSet {
    type Error = RegionSetError;

    fn try_from(value: &[u8]) -> Result<Self> {
        RegionSet::from_reader(value)
    }
}

impl From<Vec<Region>> for RegionSet {
    fn from(regions: Vec<Region>) -> Self {
        RegionSet {
            regions,
            header: None,
            path: None,
        }
    }
}

impl<'a> Iterator for RegionSetIterator<'a> {
    type Item = &'a Region;

    fn next(&mut self) -> Option<Self::Item> {
        let region = self.region_set.regions.get(self.index)?;
        self.index += 1;
        Some(region)
    }
}

impl<'a> IntoIterator for &'a RegionSet {
    type Item = &'a Region;
    type IntoIter = RegionSetIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        RegionSetIterator {
            region_set: self,
            index: 0,
        }
    }
}
