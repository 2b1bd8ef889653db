//! Canned analysis payloads returned when the service cannot be reached.

use rackstock_model::{Analysis, AnalysisMode, GeneralIdentification, LabelExtraction};

/// Demo payload for the given mode. Never reflects the submitted image.
pub fn mock_analysis(mode: AnalysisMode) -> Analysis {
    match mode {
        AnalysisMode::Label => Analysis::Label(LabelExtraction {
            sn: "CN-0V4W68-74445-83C-335".to_string(),
            model: "M393A4K40CB2-CTD".to_string(),
            manufacturer: "Samsung".to_string(),
            all_text: [
                "Samsung",
                "32GB",
                "2Rx4",
                "PC4-2666V",
                "M393A4K40CB2-CTD",
                "CN-0V4W68-74445-83C-335",
                "SN: 0V4W68",
                "MADE IN CHINA",
                "REV A01",
                "Ver 2.5",
                "10G-SR",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
        }),
        AnalysisMode::General => Analysis::General(GeneralIdentification {
            name: "Samsung 32GB DDR4 RAM (Mock)".to_string(),
            category: "内存".to_string(),
            model: "M393A4K40CB2".to_string(),
            quantity_estimate: Some(1),
            specs: "DDR4 2666MHz ECC Registered".to_string(),
            reasoning: "Simulated identification: Recognized label format and memory chip layout."
                .to_string(),
        }),
    }
}
