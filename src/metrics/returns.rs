use crate::model::PortfolioStats;

const MONTHS_PER_YEAR: f64 = 12.0;
const ROLLING_WINDOW: usize = 3;

/// Month-over-month fractional change of a value series. A step from a
/// non-positive value has no meaningful return and counts as flat.
pub fn monthly_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| if w[0] > 0.0 { w[1] / w[0] - 1.0 } else { 0.0 })
        .collect()
}

/// (Π (1 + r))^(12 / N) − 1 where N is the number of monthly returns, one
/// fewer than the points in the series they came from. A total loss
/// compounds to −100%.
pub fn calculate_cagr(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }

    let growth = returns.iter().map(|r| 1.0 + r).product::<f64>();
    if growth <= 0.0 {
        return -1.0;
    }

    growth.powf(MONTHS_PER_YEAR / returns.len() as f64) - 1.0
}

/// Population standard deviation of monthly returns, annualized by √12.
pub fn calculate_volatility(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }

    let mean = mean(returns);
    let variance = returns.iter()
        .map(|r| (r - mean).powi(2))
        .sum::<f64>() / returns.len() as f64;

    variance.sqrt() * MONTHS_PER_YEAR.sqrt()
}

pub fn calculate_sharpe_ratio(returns: &[f64]) -> f64 {
    let volatility = calculate_volatility(returns);
    if volatility == 0.0 {
        return 0.0;
    }

    mean(returns) * MONTHS_PER_YEAR / volatility
}

/// Trailing means over every full window of `window` values.
pub fn rolling_average(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || values.len() < window {
        return Vec::new();
    }

    values.windows(window).map(mean).collect()
}

pub fn calculate_portfolio_stats(values: &[f64]) -> PortfolioStats {
    let returns = monthly_returns(values);

    PortfolioStats {
        cagr: calculate_cagr(&returns),
        volatility: calculate_volatility(&returns),
        sharpe_ratio: calculate_sharpe_ratio(&returns),
        rolling_average: rolling_average(values, ROLLING_WINDOW).last().copied(),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
