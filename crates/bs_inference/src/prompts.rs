//! Instruction templates for the two completion stages.
//!
//! Each prompt puts the instruction first and the payload last, separated by
//! a blank line.

pub fn summary_prompt(text: &str) -> String {
    format!(
        "Write a short summary in English of the following blog content:\n\n{}",
        text
    )
}

pub fn translation_prompt(english: &str) -> String {
    format!(
        "Translate the text below into pure Urdu written in Urdu script. \
         Do not use any English words and do not use Roman Urdu.\n\
         Rules:\n\
         1. Use simple, short sentences.\n\
         2. Keep the result between 5 and 15 lines.\n\
         3. Avoid technical jargon.\n\
         4. Use only common, everyday Urdu words.\n\n{}",
        english
    )
}
