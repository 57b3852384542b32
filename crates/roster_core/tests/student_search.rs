use roster_core::db::open_db_in_memory;
use roster_core::{NewStudent, SqliteStudentRepository, StudentService};

fn add(service: &mut StudentService<SqliteStudentRepository<'_>>, id: &str, name: &str, course: &str) {
    let suffix = id.to_lowercase();
    service
        .add_student(NewStudent {
            id: id.to_string(),
            name: name.to_string(),
            age: "20".to_string(),
            course: course.to_string(),
            email: format!("{suffix}@example.org"),
        })
        .unwrap();
}

#[test]
fn search_matches_id_name_and_course_case_insensitively() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&mut conn).unwrap();
    let mut service = StudentService::new(repo);

    add(&mut service, "cs-9", "Ada", "History");
    add(&mut service, "s1", "Marcus", "CS101");
    add(&mut service, "s2", "Grace", "Drama");
    add(&mut service, "s3", "Lucs", "Biology");

    let hits = service.search_students("CS").unwrap();
    let ids: Vec<&str> = hits.iter().map(|record| record.id.as_str()).collect();

    // Matched via id, course, and name respectively; ordered by ascending id.
    assert_eq!(ids, vec!["cs-9", "s1", "s3"]);
}

#[test]
fn search_with_empty_keyword_returns_every_record_in_id_order() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&mut conn).unwrap();
    let mut service = StudentService::new(repo);

    add(&mut service, "s2", "Grace", "Physics");
    add(&mut service, "s1", "Ada", "Maths");

    let hits = service.search_students("").unwrap();
    let ids: Vec<&str> = hits.iter().map(|record| record.id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s2"]);
}

#[test]
fn search_without_matches_returns_empty() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&mut conn).unwrap();
    let mut service = StudentService::new(repo);

    add(&mut service, "s1", "Ada", "Maths");

    assert!(service.search_students("chemistry").unwrap().is_empty());
}

#[test]
fn search_treats_like_wildcards_as_literal_characters() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&mut conn).unwrap();
    let mut service = StudentService::new(repo);

    add(&mut service, "s1", "Ada", "Top 10% seminar");
    add(&mut service, "s2", "Grace", "Physics");

    let percent = service.search_students("10%").unwrap();
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].id, "s1");

    // A bare `%` only matches records containing a literal percent sign.
    let bare = service.search_students("%").unwrap();
    assert_eq!(bare.len(), 1);
    assert_eq!(bare[0].id, "s1");

    // `_` must not act as a single-character wildcard.
    assert!(service.search_students("s_").unwrap().is_empty());
}

#[test]
fn search_does_not_match_on_email() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&mut conn).unwrap();
    let mut service = StudentService::new(repo);

    add(&mut service, "s1", "Ada", "Maths");

    assert!(service.search_students("example.org").unwrap().is_empty());
}
