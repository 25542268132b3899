//! Static reference data published alongside each year's admissions: the
//! undergraduate score lines per track and the official announcement URL.

use crate::config::Capabilities;

/// Minimum undergraduate admission scores for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreLine {
    /// 物理类 (physics track).
    pub physics: u32,
    /// 历史类 (history track).
    pub history: u32,
}

const SCORE_LINES: &[(&str, ScoreLine)] = &[
    ("2024", ScoreLine { physics: 422, history: 438 }),
    ("2023", ScoreLine { physics: 415, history: 428 }),
    ("2022", ScoreLine { physics: 414, history: 451 }),
    ("2021", ScoreLine { physics: 434, history: 466 }),
];

const SOURCE_URLS: &[(&str, &str)] = &[
    ("2024", "https://jyt.hunan.gov.cn/jyt/xzxx/202407/t20240720_33432339.html"),
    ("2023", "https://jyt.hunan.gov.cn/jyt/xzxx/202307/t20230720_29480478.html"),
    ("2022", "https://jyt.hunan.gov.cn/jyt/xzxx/202207/t20220720_29118205.html"),
    (
        "2021",
        "https://jyt.hunan.gov.cn/jyt/sjyt/hnsjyksy/web/ksyzkzx/202107/t20210719_22743315.html",
    ),
];

pub fn score_line(year: &str) -> Option<ScoreLine> {
    SCORE_LINES
        .iter()
        .find(|(y, _)| *y == year.trim())
        .map(|(_, line)| *line)
}

pub fn source_url(year: &str) -> Option<&'static str> {
    SOURCE_URLS
        .iter()
        .find(|(y, _)| *y == year.trim())
        .map(|(_, url)| *url)
}

// ---------------------------------------------------------------------------
// Info panel contents
// ---------------------------------------------------------------------------

/// What the info strip shows for the selected year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfoPanel {
    pub score_line: Option<ScoreLine>,
    /// `None` hides the link entirely.
    pub source_link: Option<&'static str>,
}

impl InfoPanel {
    pub fn for_year(year: &str, caps: &Capabilities) -> Self {
        InfoPanel {
            score_line: score_line(year),
            source_link: if caps.source_link { source_url(year) } else { None },
        }
    }

    /// The threshold labels, empty when the year has no score line.
    pub fn lines(&self) -> Vec<String> {
        match self.score_line {
            Some(line) => vec![
                format!("本科物理类分数线: {}", line.physics),
                format!("本科历史类分数线: {}", line.history),
            ],
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_years_show_both_thresholds() {
        for (year, line) in SCORE_LINES {
            let info = InfoPanel::for_year(year, &Capabilities::default());
            assert_eq!(
                info.lines(),
                vec![
                    format!("本科物理类分数线: {}", line.physics),
                    format!("本科历史类分数线: {}", line.history),
                ]
            );
        }
        assert_eq!(score_line("2024"), Some(ScoreLine { physics: 422, history: 438 }));
    }

    #[test]
    fn unknown_year_shows_nothing() {
        let info = InfoPanel::for_year("2019", &Capabilities::default());
        assert!(info.lines().is_empty());
        assert_eq!(info.source_link, None);
    }

    #[test]
    fn source_link_follows_capability() {
        let on = InfoPanel::for_year("2022", &Capabilities::default());
        assert_eq!(on.source_link, source_url("2022"));
        assert!(on.source_link.is_some());

        let off = InfoPanel::for_year("2022", &Capabilities { search: true, source_link: false });
        assert_eq!(off.source_link, None);
        assert_eq!(off.score_line, on.score_line);
    }
}
