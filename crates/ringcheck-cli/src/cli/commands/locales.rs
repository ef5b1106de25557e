use ringcheck_core::Locale;

use crate::exit_codes::SUCCESS;

pub fn run() -> i32 {
    for locale in Locale::ALL {
        println!(
            "{}\t{}\tend call: {}",
            locale.code(),
            locale.display_name(),
            locale.end_call_phrases().join(", ")
        );
    }
    SUCCESS
}
