/// Pick the grammatical form agreeing with a count
///
/// With three forms the Slavic rule applies: forms[0] for 1, 21, 31, ...
/// (but not 11), forms[1] for 2-4, 22-24, ... (but not 12-14), forms[2]
/// otherwise. Two forms distinguish exactly one from everything else. A
/// single form is always used as-is. No forms gives "".
pub fn choose_form<'a>(n: i64, forms: &[&'a str]) -> &'a str {
    let n = n.unsigned_abs();
    match *forms {
        [] => "",
        [one, few, many] => {
            if n % 10 == 1 && n % 100 != 11 {
                one
            } else if (2..=4).contains(&(n % 10)) && !(12..=14).contains(&(n % 100)) {
                few
            } else {
                many
            }
        }
        [one, other] => {
            if n == 1 {
                one
            } else {
                other
            }
        }
        [first, ..] => first,
    }
}
