use std::fmt::{self, Display};

/// Name given to regions whose source line carries no name column.
pub const UNNAMED_REGION: &str = ".";

///
/// Region struct, representation of one line of a BED-like file.
///
/// Coordinates are 0-based and half-open. Every column after `end` is kept
/// verbatim (tab-joined) in `rest`.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Region {
    pub chr: String,
    pub start: u32,
    pub end: u32,

    pub rest: Option<String>,
}

impl Region {
    ///
    /// The name column of the region: the first field after `end`,
    /// or `"."` when the line had only three columns.
    ///
    pub fn name(&self) -> &str {
        self.rest
            .as_deref()
            .and_then(|rest| rest.split('\t').next())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNNAMED_REGION)
    }

    /// `(start, end)`, the key a region is stored under within its chromosome.
    pub fn coords(&self) -> (u32, u32) {
        (self.start, self.end)
    }

    ///
    /// Get file string of Region
    ///
    pub fn as_string(&self) -> String {
        format!(
            "{}\t{}\t{}{}",
            self.chr,
            self.start,
            self.end,
            self.rest
                .as_deref()
                .map_or(String::new(), |s| format!("\t{}", s)),
        )
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn region(start: u32, end: u32, rest: Option<&str>) -> Region {
        Region {
            chr: "chr1".to_string(),
            start,
            end,
            rest: rest.map(String::from),
        }
    }

    #[rstest]
    fn test_name_is_first_rest_column() {
        let r = region(100, 200, Some("geneA\t0\t+"));
        assert_eq!(r.name(), "geneA");
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    fn test_missing_name_is_dot(#[case] rest: Option<&str>) {
        assert_eq!(region(1, 2, rest).name(), UNNAMED_REGION);
    }

    #[rstest]
    fn test_as_string() {
        assert_eq!(region(5, 9, Some("0.5-10")).as_string(), "chr1\t5\t9\t0.5-10");
        assert_eq!(region(5, 9, None).to_string(), "chr1\t5\t9");
    }
}
