use rust_xlsxwriter::Workbook;

/// Deterministic detector noise: splitmix64 stream, normal deviates by
/// the polar Marsaglia method.
struct DetectorNoise {
    state: u64,
    spare: Option<f64>,
}

impl DetectorNoise {
    fn seeded(seed: u64) -> Self {
        DetectorNoise { state: seed, spare: None }
    }

    fn next_bits(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in [-1, 1).
    fn signed_unit(&mut self) -> f64 {
        (self.next_bits() >> 11) as f64 / (1u64 << 52) as f64 - 1.0
    }

    fn normal(&mut self, sigma: f64) -> f64 {
        if let Some(z) = self.spare.take() {
            return z * sigma;
        }
        loop {
            let (u, v) = (self.signed_unit(), self.signed_unit());
            let s = u * u + v * v;
            if s > 0.0 && s < 1.0 {
                let k = (-2.0 * s.ln() / s).sqrt();
                self.spare = Some(v * k);
                return u * k * sigma;
            }
        }
    }
}

/// Gaussian line shape of unit height.
fn line_shape(wavelength: f64, center: f64, width: f64) -> f64 {
    let d = (wavelength - center) / width;
    (-0.5 * d * d).exp()
}

/// One emission spectrum per time step: a Gaussian line at 520 nm decaying
/// with a 40 ns lifetime on top of a flat background.
fn generate_matrix(wavelengths: &[f64], times: &[f64], noise: &mut DetectorNoise) -> Vec<Vec<f64>> {
    times
        .iter()
        .map(|&t| {
            let amplitude = 100.0 * (-t / 40.0).exp();
            wavelengths
                .iter()
                .map(|&wl| 2.0 + amplitude * line_shape(wl, 520.0, 12.0) + noise.normal(0.3))
                .collect()
        })
        .collect()
}

fn main() {
    let mut noise = DetectorNoise::seeded(42);

    // Wavelengths: 400 → 700 nm, step 5; times: 0 → 198 ns, step 2
    let wavelengths: Vec<f64> = (0..=60).map(|i| 400.0 + i as f64 * 5.0).collect();
    let times: Vec<f64> = (0..100).map(|i| i as f64 * 2.0).collect();
    let matrix = generate_matrix(&wavelengths, &times, &mut noise);

    // CSV: wavelengths across the header, time in the trailing column
    let csv_path = "sample_matrix.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    let mut header: Vec<String> = wavelengths.iter().map(|w| w.to_string()).collect();
    header.push("time_ns".to_string());
    writer.write_record(&header).expect("Failed to write header");
    for (row, t) in matrix.iter().zip(&times) {
        let mut record: Vec<String> = row.iter().map(|v| format!("{v:.4}")).collect();
        record.push(t.to_string());
        writer.write_record(&record).expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush CSV");

    // XLSX: same layout, row 1 holds the wavelengths
    let xlsx_path = "sample_matrix.xlsx";
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let time_col = wavelengths.len() as u16;
    for (c, wl) in wavelengths.iter().enumerate() {
        sheet.write_number(0, c as u16, *wl).expect("Failed to write wavelength");
    }
    sheet.write_string(0, time_col, "time_ns").expect("Failed to write header");
    for (r, (row, t)) in matrix.iter().zip(&times).enumerate() {
        let r = (r + 1) as u32;
        for (c, v) in row.iter().enumerate() {
            sheet.write_number(r, c as u16, *v).expect("Failed to write intensity");
        }
        sheet.write_number(r, time_col, *t).expect("Failed to write time");
    }
    workbook.save(xlsx_path).expect("Failed to save workbook");

    // XY: y = log_3(x) with a little noise, for the log_n_x fit
    let xy_path = "sample_xy.csv";
    let mut writer = csv::Writer::from_path(xy_path).expect("Failed to create CSV file");
    writer.write_record(["x", "y"]).expect("Failed to write header");
    for i in 1..=50 {
        let x = i as f64 * 0.5;
        let y = x.ln() / 3f64.ln() + noise.normal(0.02);
        writer
            .write_record([x.to_string(), format!("{y:.5}")])
            .expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush CSV");

    println!(
        "Wrote {} spectra ({} wavelengths each) to {csv_path} and {xlsx_path}; 50 points to {xy_path}",
        times.len(),
        wavelengths.len()
    );
}
