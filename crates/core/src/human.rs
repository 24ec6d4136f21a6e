/// Short form of a large value: `20338986` becomes `20.34 M`.
pub fn human_value(v: f64) -> String {
    let units = ["", "K", "M", "B", "T"];
    let mut n = v;
    let mut u = 0;
    while n.abs() >= 1000.0 && u < units.len() - 1 {
        n /= 1000.0;
        u += 1;
    }
    if u == 0 {
        format!("{}", (n * 100.0).round() / 100.0)
    } else {
        format!("{:.2} {}", n, units[u])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_by_thousands() {
        assert_eq!(human_value(20338986.0), "20.34 M");
        assert_eq!(human_value(1500.0), "1.50 K");
        assert_eq!(human_value(82.53), "82.53");
        assert_eq!(human_value(2.5e15), "2500.00 T");
    }
}
