//! Pure statistics over grades already loaded from the database.
//!
//! Averages are weighted by coefficient unless stated otherwise. An empty
//! input always yields zeros rather than `NaN`.

use std::cmp::Ordering;

use gradebook_models::{
    AveragesByType, ClassStatistics, DistributionBucket, Grade, RankingEntry, RankingPosition,
    StudentAggregate, StudentProgress, TypeAverage, UserId, display_name,
};

/// Lower bound (inclusive) and label of each distribution bucket, best first.
const BUCKETS: [(f64, &str); 5] = [
    (18.0, "Excellent (18-20)"),
    (15.0, "Very Good (15-17)"),
    (12.0, "Good (12-14)"),
    (10.0, "Average (10-11)"),
    (0.0, "Poor (0-9)"),
];

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `SUM(value * coefficient) / SUM(coefficient)`, 0 without grades.
pub fn weighted_average<'a>(grades: impl IntoIterator<Item = &'a Grade>) -> f64 {
    let (weighted, coefficients) = grades.into_iter().fold((0.0, 0i64), |(w, c), g| {
        (w + g.value * f64::from(g.coefficient), c + i64::from(g.coefficient))
    });
    average_from_sums(Some(weighted), Some(coefficients))
}

pub fn average_from_sums(weighted_sum: Option<f64>, coefficient_sum: Option<i64>) -> f64 {
    match (weighted_sum, coefficient_sum) {
        (Some(weighted), Some(coefficients)) if coefficients > 0 => weighted / coefficients as f64,
        _ => 0.0,
    }
}

/// Orders students by average (highest first), then by display name, and
/// numbers them 1..n. Students without grades rank last with 0.
pub fn rank_students(aggregates: Vec<StudentAggregate>) -> Vec<RankingEntry> {
    let mut entries: Vec<RankingEntry> = aggregates
        .into_iter()
        .map(|a| RankingEntry {
            rank: 0,
            average: average_from_sums(a.weighted_sum, a.coefficient_sum),
            student_id: a.student_id,
            name: a.name,
            email: a.email,
            grade_count: a.grade_count,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.average.total_cmp(&a.average).then_with(|| {
            display_name(a.name.as_deref(), &a.email)
                .cmp(display_name(b.name.as_deref(), &b.email))
        })
    });

    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index as i64 + 1;
    }

    entries
}

pub fn position_of(ranking: &[RankingEntry], student_id: UserId) -> Option<RankingPosition> {
    ranking
        .iter()
        .find(|entry| entry.student_id == student_id)
        .map(|entry| RankingPosition {
            rank: entry.rank,
            average: entry.average,
            total_students: ranking.len() as i64,
        })
}

/// Plain (unweighted) mean per grade type.
pub fn averages_by_type(grades: &[Grade]) -> AveragesByType {
    let mut sums: std::collections::BTreeMap<String, (f64, i64)> = Default::default();
    for grade in grades {
        let slot = sums.entry(grade.grade_type.to_string()).or_default();
        slot.0 += grade.value;
        slot.1 += 1;
    }

    sums.into_iter()
        .map(|(grade_type, (sum, count))| {
            (
                grade_type,
                TypeAverage {
                    average: sum / count as f64,
                    count,
                },
            )
        })
        .collect()
}

/// Spread of raw grade values in a course. `average` is the plain mean.
pub fn class_statistics(grades: &[Grade]) -> ClassStatistics {
    if grades.is_empty() {
        return ClassStatistics::default();
    }

    let min = grades.iter().map(|g| g.value).fold(f64::INFINITY, f64::min);
    let max = grades.iter().map(|g| g.value).fold(f64::NEG_INFINITY, f64::max);
    let average = grades.iter().map(|g| g.value).sum::<f64>() / grades.len() as f64;

    let mut students: Vec<UserId> = grades.iter().map(|g| g.student_id).collect();
    students.sort_unstable();
    students.dedup();

    ClassStatistics {
        min,
        max,
        average,
        student_count: students.len() as i64,
        total_grades: grades.len() as i64,
    }
}

fn bucket_index(value: f64) -> usize {
    BUCKETS
        .iter()
        .position(|(lower, _)| value >= *lower)
        .unwrap_or(BUCKETS.len() - 1)
}

/// Counts per bucket, best bucket first. Empty buckets are left out.
pub fn grade_distribution(grades: &[Grade]) -> Vec<DistributionBucket> {
    if grades.is_empty() {
        return Vec::new();
    }

    let mut counts = [0i64; BUCKETS.len()];
    for grade in grades {
        counts[bucket_index(grade.value)] += 1;
    }

    let total = grades.len() as f64;
    BUCKETS
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|((_, label), count)| DistributionBucket {
            range: (*label).to_string(),
            count,
            percentage: round2(count as f64 * 100.0 / total),
        })
        .collect()
}

pub fn student_progress(grades: &[Grade]) -> StudentProgress {
    if grades.is_empty() {
        return StudentProgress::default();
    }

    let values = grades.iter().map(|g| g.value);
    StudentProgress {
        total_grades: grades.len() as i64,
        average: weighted_average(grades),
        min_grade: values.clone().fold(f64::INFINITY, f64::min),
        max_grade: values.fold(f64::NEG_INFINITY, f64::max),
    }
}

/// Descending by average; used to order per-course overviews.
pub fn by_average_desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}
