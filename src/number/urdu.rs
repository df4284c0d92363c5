//! Urdu cardinals.
//!
//! Every number below a hundred has its own word, and above that the South
//! Asian scale applies: سو (10²), ہزار (10³), لاکھ (10⁵), کروڑ (10⁷) and so
//! on in steps of a hundred. Each scale's coefficient is below a hundred, so
//! one table covers every coefficient.

const BELOW_HUNDRED: [&str; 100] = [
    "صفر", "ایک", "دو", "تین", "چار", "پانچ", "چھ", "سات", "آٹھ", "نو", //
    "دس", "گیارہ", "بارہ", "تیرہ", "چودہ", "پندرہ", "سولہ", "سترہ", "اٹھارہ", "انیس", //
    "بیس", "اکیس", "بائیس", "تئیس", "چوبیس", "پچیس", "چھبیس", "ستائیس", "اٹھائیس", "انتیس", //
    "تیس", "اکتیس", "بتیس", "تینتیس", "چونتیس", "پینتیس", "چھتیس", "سینتیس", "اڑتیس", "انتالیس", //
    "چالیس", "اکتالیس", "بیالیس", "تینتالیس", "چوالیس", "پینتالیس", "چھیالیس", "سینتالیس", "اڑتالیس", "انچاس", //
    "پچاس", "اکیاون", "باون", "ترپن", "چون", "پچپن", "چھپن", "ستاون", "اٹھاون", "انسٹھ", //
    "ساٹھ", "اکسٹھ", "باسٹھ", "ترسٹھ", "چونسٹھ", "پینسٹھ", "چھیاسٹھ", "سڑسٹھ", "اڑسٹھ", "انہتر", //
    "ستر", "اکہتر", "بہتر", "تہتر", "چوہتر", "پچھتر", "چھہتر", "ستتر", "اٹھہتر", "اناسی", //
    "اسی", "اکیاسی", "بیاسی", "تراسی", "چوراسی", "پچاسی", "چھیاسی", "ستاسی", "اٹھاسی", "نواسی", //
    "نوے", "اکیانوے", "بانوے", "ترانوے", "چورانوے", "پچانوے", "چھیانوے", "ستانوے", "اٹھانوے", "ننانوے",
];

/// Scales from largest to smallest.
const SCALES: [(u64, &str); 9] = [
    (100_000_000_000_000_000, "سنکھ"),
    (1_000_000_000_000_000, "پدم"),
    (10_000_000_000_000, "نیل"),
    (100_000_000_000, "کھرب"),
    (1_000_000_000, "ارب"),
    (10_000_000, "کروڑ"),
    (100_000, "لاکھ"),
    (1_000, "ہزار"),
    (100, "سو"),
];

const MINUS: &str = "منفی";

pub(super) fn to_words(n: i64) -> String {
    if n < 0 {
        return format!("{MINUS} {}", cardinal(n.unsigned_abs()));
    }
    cardinal(n.unsigned_abs())
}

fn cardinal(n: u64) -> String {
    if n == 0 {
        return BELOW_HUNDRED[0].to_string();
    }

    let mut words: Vec<&str> = Vec::new();
    let mut rest = n;
    for (value, name) in SCALES {
        let coefficient = rest / value;
        if coefficient > 0 {
            // i64::MAX / 10^17 is 92.
            words.push(BELOW_HUNDRED[coefficient as usize]);
            words.push(name);
            rest %= value;
        }
    }
    if rest > 0 {
        words.push(BELOW_HUNDRED[rest as usize]);
    }
    words.join(" ")
}
