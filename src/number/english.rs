//! English cardinals, British style: "one hundred and five",
//! "one thousand, two hundred and thirty-four".

const ONES: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// Scale word for each group of three digits, lowest first.
const SCALES: [&str; 7] = [
    "",
    "thousand",
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
];

pub(super) fn to_words(n: i64) -> String {
    if n < 0 {
        return format!("minus {}", cardinal(n.unsigned_abs()));
    }
    cardinal(n.unsigned_abs())
}

fn cardinal(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    let mut groups = Vec::new();
    let mut rest = n;
    while rest > 0 {
        groups.push((rest % 1000) as usize);
        rest /= 1000;
    }

    let mut out = String::new();
    let mut higher = false;
    for (scale, &group) in groups.iter().enumerate().rev() {
        if group == 0 {
            continue;
        }
        if higher {
            // A trailing group under a hundred is joined with "and".
            out.push_str(if scale == 0 && group < 100 { " and " } else { ", " });
        }
        out.push_str(&below_thousand(group));
        if scale > 0 {
            out.push(' ');
            out.push_str(SCALES[scale]);
        }
        higher = true;
    }
    out
}

fn below_thousand(n: usize) -> String {
    let (hundreds, rest) = (n / 100, n % 100);
    match (hundreds, rest) {
        (0, r) => below_hundred(r),
        (h, 0) => format!("{} hundred", ONES[h]),
        (h, r) => format!("{} hundred and {}", ONES[h], below_hundred(r)),
    }
}

fn below_hundred(n: usize) -> String {
    match n {
        0..=19 => ONES[n].to_string(),
        _ if n % 10 == 0 => TENS[n / 10].to_string(),
        _ => format!("{}-{}", TENS[n / 10], ONES[n % 10]),
    }
}
