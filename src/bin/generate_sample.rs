use std::path::Path;

use anyhow::{Context, Result};
use score_explorer::config::Config;
use score_explorer::reference::{self, ScoreLine};
use serde_json::{Map, Value, json};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `0..n`.
    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

const COLUMNS: [&str; 5] = ["院校代号", "院校名称", "科类", "所在地", "投档线"];

/// (name, province, prestige 0..1)
const SCHOOLS: &[(&str, &str, f64)] = &[
    ("湖南大学", "湖南", 0.85),
    ("中南大学", "湖南", 0.88),
    ("湖南师范大学", "湖南", 0.70),
    ("湘潭大学", "湖南", 0.55),
    ("长沙理工大学", "湖南", 0.45),
    ("湖南农业大学", "湖南", 0.35),
    ("南华大学", "湖南", 0.38),
    ("吉首大学", "湖南", 0.20),
    ("武汉大学", "湖北", 0.92),
    ("华中科技大学", "湖北", 0.93),
    ("中山大学", "广东", 0.90),
    ("暨南大学", "广东", 0.72),
    ("四川大学", "四川", 0.86),
    ("西南交通大学", "四川", 0.62),
    ("南昌大学", "江西", 0.58),
    ("广西大学", "广西", 0.50),
    ("贵州大学", "贵州", 0.42),
    ("云南大学", "云南", 0.52),
    ("长沙学院", "湖南", 0.12),
    ("湖南工程学院", "湖南", 0.08),
];

fn year_document(year: &str, lines: ScoreLine, rng: &mut SimpleRng) -> Value {
    let tracks = [("物理类", i64::from(lines.physics)), ("历史类", i64::from(lines.history))];
    let mut data = Vec::new();
    for (code, &(name, province, prestige)) in SCHOOLS.iter().enumerate() {
        for (track, line) in tracks {
            // A few schools skip a track in a given year.
            if rng.next_f64() < 0.1 {
                continue;
            }
            let headroom = 660 - line;
            let score = line + (prestige * headroom as f64) as i64 + rng.below(15) as i64 - 7;

            let mut row = Map::new();
            row.insert("院校代号".into(), json!(format!("{:04}", 1000 + code)));
            row.insert("院校名称".into(), json!(name));
            row.insert("科类".into(), json!(track));
            // Occasionally leave the location out entirely.
            if rng.next_f64() >= 0.05 {
                row.insert("所在地".into(), json!(province));
            }
            // Under-filled programmes publish no cutoff.
            let cutoff = match rng.below(40) {
                0 => Value::Null,
                1 => json!("缺额"),
                _ => json!(score.max(line)),
            };
            row.insert("投档线".into(), cutoff);
            data.push(Value::Object(row));
        }
    }

    log::debug!("{year}: {} rows", data.len());
    json!({ "columns": COLUMNS, "data": data })
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = Path::new("data");
    std::fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    for year in Config::default().years {
        let Some(lines) = reference::score_line(&year) else {
            log::warn!("No score line for {year}, skipping");
            continue;
        };
        let doc = year_document(&year, lines, &mut rng);
        let path = out_dir.join(format!("{year}.json"));
        let text = serde_json::to_string_pretty(&doc).context("serializing sample year")?;
        std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoffs_never_fall_below_the_published_line() {
        let lines = reference::score_line("2022").unwrap();
        let doc = year_document("2022", lines, &mut SimpleRng::new(7));
        let rows = doc["data"].as_array().unwrap();
        assert!(!rows.is_empty());
        for row in rows {
            let line = match row["科类"].as_str().unwrap() {
                "物理类" => lines.physics,
                _ => lines.history,
            };
            if let Some(cutoff) = row["投档线"].as_i64() {
                assert!(cutoff >= i64::from(line), "{row}");
            }
        }
    }
}
