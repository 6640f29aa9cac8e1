//! A4 PDF rendering of bulletins and course reports.
//!
//! Rendering only sees plain data; gathering it is the job of
//! [`super::service::ReportService`].

use chrono::{DateTime, Utc};
use gradebook_models::{ClassStatistics, DistributionBucket, Grade, RankingPosition};
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const LINE_HEIGHT: f32 = 7.0;

const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 13.0;
const BODY_SIZE: f32 = 10.0;

pub struct BulletinData {
    pub school_name: String,
    pub student_name: String,
    pub student_email: String,
    pub course_title: String,
    pub teacher_name: String,
    pub grades: Vec<Grade>,
    pub average: Option<f64>,
    pub rank: Option<RankingPosition>,
    pub generated_at: DateTime<Utc>,
}

pub struct CourseReportRow {
    pub student_name: String,
    pub grade_count: i64,
    pub average: Option<f64>,
}

pub struct CourseReportData {
    pub school_name: String,
    pub course_title: String,
    pub teacher_name: String,
    /// Expected sorted by average, highest first
    pub rows: Vec<CourseReportRow>,
    pub statistics: ClassStatistics,
    pub distribution: Vec<DistributionBucket>,
    pub generated_at: DateTime<Utc>,
}

/// Writes lines top to bottom, opening a new page when the bottom margin is
/// reached.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl PageWriter {
    fn new(title: &str) -> anyhow::Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| anyhow::anyhow!("Failed to load Helvetica: {e:?}"))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| anyhow::anyhow!("Failed to load Helvetica-Bold: {e:?}"))?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN,
        })
    }

    fn ensure_room(&mut self, height: f32) {
        if self.y - height >= MARGIN {
            return;
        }
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn write(&mut self, text: &str, size: f32, bold: bool) {
        self.write_at(&[(0.0, text)], size, bold);
    }

    /// One line made of columns, each `(x offset from the margin, text)`.
    fn write_at(&mut self, columns: &[(f32, &str)], size: f32, bold: bool) {
        let height = LINE_HEIGHT.max(size * 0.5);
        self.ensure_room(height);
        let font = if bold { &self.bold } else { &self.regular };
        for (x, text) in columns {
            self.layer
                .use_text(*text, size, Mm(MARGIN + x), Mm(self.y), font);
        }
        self.y -= height;
    }

    fn gap(&mut self) {
        self.y -= LINE_HEIGHT / 2.0;
    }

    fn finish(self) -> anyhow::Result<Vec<u8>> {
        self.doc
            .save_to_bytes()
            .map_err(|e| anyhow::anyhow!("Failed to write PDF: {e:?}"))
    }
}

fn format_average(average: Option<f64>) -> String {
    average
        .map(|a| format!("{a:.2} / 20"))
        .unwrap_or_else(|| "N/A".to_string())
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    format!("Generated on {}", at.format("%d/%m/%Y %H:%M UTC"))
}

pub fn render_bulletin(data: &BulletinData) -> anyhow::Result<Vec<u8>> {
    let mut pdf = PageWriter::new(&format!("Bulletin - {}", data.course_title))?;

    pdf.write(&data.school_name, TITLE_SIZE, true);
    pdf.write("Student Report Card", HEADING_SIZE, false);
    pdf.gap();

    pdf.write(
        &format!("Student: {} ({})", data.student_name, data.student_email),
        BODY_SIZE,
        false,
    );
    pdf.write(&format!("Course: {}", data.course_title), BODY_SIZE, false);
    pdf.write(&format!("Teacher: {}", data.teacher_name), BODY_SIZE, false);
    pdf.gap();

    pdf.write("Grades", HEADING_SIZE, true);
    if data.grades.is_empty() {
        pdf.write("No grades recorded yet.", BODY_SIZE, false);
    } else {
        pdf.write_at(
            &[(0.0, "Type"), (50.0, "Grade"), (90.0, "Coefficient"), (130.0, "Date")],
            BODY_SIZE,
            true,
        );
        for grade in &data.grades {
            let value = format!("{:.2} / 20", grade.value);
            let coefficient = grade.coefficient.to_string();
            let date = grade.created_at.format("%d/%m/%Y").to_string();
            pdf.write_at(
                &[
                    (0.0, grade.grade_type.as_str()),
                    (50.0, &value),
                    (90.0, &coefficient),
                    (130.0, &date),
                ],
                BODY_SIZE,
                false,
            );
        }
    }
    pdf.gap();

    pdf.write(
        &format!("Weighted average: {}", format_average(data.average)),
        HEADING_SIZE,
        true,
    );
    let rank = data
        .rank
        .as_ref()
        .map(|r| format!("Rank: {} / {}", r.rank, r.total_students))
        .unwrap_or_else(|| "Rank: N/A".to_string());
    pdf.write(&rank, BODY_SIZE, false);
    pdf.gap();

    pdf.write(&format_timestamp(data.generated_at), BODY_SIZE, false);

    pdf.finish()
}

pub fn render_course_report(data: &CourseReportData) -> anyhow::Result<Vec<u8>> {
    let mut pdf = PageWriter::new(&format!("Course Report - {}", data.course_title))?;

    pdf.write(&data.school_name, TITLE_SIZE, true);
    pdf.write(&format!("Course Report: {}", data.course_title), HEADING_SIZE, false);
    pdf.write(&format!("Teacher: {}", data.teacher_name), BODY_SIZE, false);
    pdf.write(
        &format!("Enrolled students: {}", data.rows.len()),
        BODY_SIZE,
        false,
    );
    pdf.gap();

    pdf.write("Students", HEADING_SIZE, true);
    if data.rows.is_empty() {
        pdf.write("No students enrolled.", BODY_SIZE, false);
    } else {
        pdf.write_at(
            &[(0.0, "#"), (10.0, "Student"), (100.0, "Grades"), (130.0, "Average")],
            BODY_SIZE,
            true,
        );
        for (index, row) in data.rows.iter().enumerate() {
            let position = (index + 1).to_string();
            let count = row.grade_count.to_string();
            let average = format_average(row.average);
            pdf.write_at(
                &[
                    (0.0, &position),
                    (10.0, &row.student_name),
                    (100.0, &count),
                    (130.0, &average),
                ],
                BODY_SIZE,
                false,
            );
        }
    }
    pdf.gap();

    let stats = &data.statistics;
    pdf.write("Class statistics", HEADING_SIZE, true);
    pdf.write(&format!("Total grades: {}", stats.total_grades), BODY_SIZE, false);
    pdf.write(&format!("Graded students: {}", stats.student_count), BODY_SIZE, false);
    pdf.write(&format!("Average: {:.2}", stats.average), BODY_SIZE, false);
    pdf.write(
        &format!("Lowest: {:.2}   Highest: {:.2}", stats.min, stats.max),
        BODY_SIZE,
        false,
    );
    pdf.gap();

    if !data.distribution.is_empty() {
        pdf.write("Distribution", HEADING_SIZE, true);
        for bucket in &data.distribution {
            let count = bucket.count.to_string();
            let percentage = format!("{:.2}%", bucket.percentage);
            pdf.write_at(
                &[(0.0, &bucket.range), (60.0, &count), (80.0, &percentage)],
                BODY_SIZE,
                false,
            );
        }
        pdf.gap();
    }

    pdf.write(&format_timestamp(data.generated_at), BODY_SIZE, false);

    pdf.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradebook_models::{CourseId, GradeId, GradeType, UserId};

    fn bulletin(grades: Vec<Grade>) -> BulletinData {
        BulletinData {
            school_name: "Gradebook School".to_string(),
            student_name: "Ada Lovelace".to_string(),
            student_email: "ada@school.test".to_string(),
            course_title: "Mathematics".to_string(),
            teacher_name: "Mr. Smith".to_string(),
            average: Some(14.5),
            rank: Some(RankingPosition {
                rank: 2,
                average: 14.5,
                total_students: 12,
            }),
            grades,
            generated_at: Utc::now(),
        }
    }

    fn grade(value: f64) -> Grade {
        Grade {
            id: GradeId::new(),
            student_id: UserId::new(),
            course_id: CourseId::new(),
            value,
            grade_type: GradeType::Exam,
            coefficient: 2,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_bulletin_is_a_pdf() {
        let bytes = render_bulletin(&bulletin(vec![grade(12.0), grade(17.0)])).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_bulletin_without_grades() {
        let mut data = bulletin(Vec::new());
        data.average = None;
        data.rank = None;
        let bytes = render_bulletin(&data).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_long_bulletin_spills_onto_more_pages() {
        let short = render_bulletin(&bulletin(vec![grade(10.0)])).unwrap();
        let long = render_bulletin(&bulletin((0..120).map(|_| grade(10.0)).collect())).unwrap();
        assert!(long.len() > short.len());
    }

    #[test]
    fn test_course_report_is_a_pdf() {
        let data = CourseReportData {
            school_name: "Gradebook School".to_string(),
            course_title: "Physics".to_string(),
            teacher_name: "Ms. Curie".to_string(),
            rows: vec![
                CourseReportRow {
                    student_name: "Ada".to_string(),
                    grade_count: 3,
                    average: Some(15.0),
                },
                CourseReportRow {
                    student_name: "Bob".to_string(),
                    grade_count: 0,
                    average: None,
                },
            ],
            statistics: ClassStatistics {
                min: 10.0,
                max: 18.0,
                average: 15.0,
                student_count: 1,
                total_grades: 3,
            },
            distribution: vec![DistributionBucket {
                range: "Very Good (15-17)".to_string(),
                count: 3,
                percentage: 100.0,
            }],
            generated_at: Utc::now(),
        };

        let bytes = render_course_report(&data).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_format_average() {
        assert_eq!(format_average(Some(13.456)), "13.46 / 20");
        assert_eq!(format_average(None), "N/A");
    }
}
