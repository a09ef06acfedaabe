use std::io::BufWriter;

use anyhow::{Context, Result};

use rusty_facets::data::model::{AxisInfo, BasicData, DataBlob, RawRecord, RecordValue, ValueType};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    // Two inputs on a grid: time 0..20 (step 1), temperature 20..80 (step 10)
    let times: Vec<f64> = (0..20).map(f64::from).collect();
    let temperatures: Vec<f64> = (0..7).map(|i| 20.0 + f64::from(i) * 10.0).collect();

    // label, peak temperature, peak height
    let materials = [("steel", 40.0, 1.0), ("copper", 60.0, 0.7), ("glass", 30.0, 0.4)];

    let mut records = Vec::new();
    for &(label, peak_temp, height) in &materials {
        for &temp in &temperatures {
            for &t in &times {
                let strain = gaussian(temp, peak_temp, 15.0, height) * (1.0 + 0.05 * t)
                    + rng.gauss(0.0, 0.02);
                let stress = 100.0 * strain + rng.gauss(0.0, 1.5);
                let cost = height * 10.0 + 0.1 * temp;
                records.push(RawRecord::new(
                    vec![t, temp],
                    RecordValue::StringArray(label.to_string(), vec![strain, stress, cost]),
                ));
            }
        }
    }

    let blob = DataBlob {
        basic_data: BasicData {
            axes: vec![
                AxisInfo {
                    name: "time".into(),
                    min: Some(0.0),
                    max: Some(19.0),
                    interval: Some(1.0),
                },
                AxisInfo {
                    name: "temperature".into(),
                    min: Some(20.0),
                    max: Some(80.0),
                    interval: Some(10.0),
                },
            ],
            value_type: ValueType::StringArray,
        },
        data_value: records,
    };

    let output_path = "sample_data.json";
    let file = std::fs::File::create(output_path).context("creating output file")?;
    serde_json::to_writer_pretty(BufWriter::new(file), &blob).context("writing sample blob")?;

    println!(
        "Wrote {} records ({} inputs, {} outputs + label) to {output_path}",
        blob.len(),
        blob.basic_data.axes.len(),
        3
    );
    Ok(())
}
