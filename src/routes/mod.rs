pub mod assignments;
pub mod auth;
pub mod courses;
pub mod notifications;
pub mod offers;
pub mod submissions;
pub mod system;
pub mod users;

pub use assignments::configure_assignments_routes;
pub use auth::configure_auth_routes;
pub use courses::configure_courses_routes;
pub use notifications::configure_notifications_routes;
pub use offers::configure_offers_routes;
pub use submissions::configure_submissions_routes;
pub use system::configure_system_routes;
pub use users::configure_user_routes;

use actix_web::web;

/// 注册全部路由；作业路由前缀更长，必须先于课程路由注册
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    configure_auth_routes(cfg);
    configure_assignments_routes(cfg);
    configure_courses_routes(cfg);
    configure_submissions_routes(cfg);
    configure_user_routes(cfg);
    configure_notifications_routes(cfg);
    configure_offers_routes(cfg);
    configure_system_routes(cfg);
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{Value, json};

    use crate::models::users::entities::UserRole;
    use crate::services::test_support::{TestContext, bearer};

    async fn body(resp: actix_web::dev::ServiceResponse) -> Value {
        test::read_body_json(resp).await
    }

    async fn post(
        ctx: &TestContext,
        uri: &str,
        token: &str,
        payload: Value,
    ) -> actix_web::dev::ServiceResponse {
        ctx.call(
            test::TestRequest::post()
                .uri(uri)
                .insert_header(bearer(token))
                .set_json(payload),
        )
        .await
    }

    /// 教练建课、学员选课，返回课程 ID
    async fn course_with_student(
        ctx: &TestContext,
        coach_token: &str,
        student_token: &str,
        code: &str,
    ) -> i64 {
        let resp = post(
            ctx,
            "/api/v1/courses",
            coach_token,
            json!({ "title": "Speed and Agility", "code": code, "credits": 1.0 }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let course_id = body(resp).await["data"]["id"].as_i64().unwrap();

        let resp = ctx
            .call(
                test::TestRequest::post()
                    .uri(&format!("/api/v1/courses/{course_id}/enroll"))
                    .insert_header(bearer(student_token)),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        course_id
    }

    #[actix_web::test]
    async fn test_health_is_public() {
        let ctx = TestContext::new().await;
        let resp = ctx
            .call(test::TestRequest::get().uri("/api/v1/system/health"))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body(resp).await;
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn test_register_login_and_me() {
        let ctx = TestContext::new().await;
        let register = json!({
            "username": "athlete_7",
            "email": "athlete7@academy.test",
            "password": "Str0ngPass"
        });

        let resp = ctx
            .call(
                test::TestRequest::post()
                    .uri("/api/v1/auth/register")
                    .set_json(&register),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(body(resp).await["data"]["role"], "student");

        let resp = ctx
            .call(
                test::TestRequest::post()
                    .uri("/api/v1/auth/register")
                    .set_json(&register),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = ctx
            .call(test::TestRequest::post().uri("/api/v1/auth/login").set_json(json!({
                "username": "athlete7@academy.test",
                "password": "Str0ngPass"
            })))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get("set-cookie").is_some());
        let token = body(resp).await["data"]["access_token"]
            .as_str()
            .unwrap()
            .to_string();

        let resp = ctx
            .call(
                test::TestRequest::get()
                    .uri("/api/v1/auth/me")
                    .insert_header(bearer(&token)),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body(resp).await["data"]["user"]["username"], "athlete_7");

        let resp = ctx
            .call(test::TestRequest::get().uri("/api/v1/auth/me"))
            .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_course_to_transcript_flow() {
        let ctx = TestContext::new().await;
        let (_coach, coach_token) = ctx.user("coach_01", UserRole::Instructor).await;
        let (student, student_token) = ctx.user("athlete_01", UserRole::Student).await;
        let (_other, other_token) = ctx.user("athlete_02", UserRole::Student).await;

        let course = json!({
            "title": "English I",
            "code": "eng-101",
            "credits": 1.0,
            "is_core": true
        });

        // 学员不能创建课程
        let resp = ctx
            .call(
                test::TestRequest::post()
                    .uri("/api/v1/courses")
                    .insert_header(bearer(&student_token))
                    .set_json(&course),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = ctx
            .call(
                test::TestRequest::post()
                    .uri("/api/v1/courses")
                    .insert_header(bearer(&coach_token))
                    .set_json(&course),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let json = body(resp).await;
        assert_eq!(json["data"]["code"], "ENG-101");
        let course_id = json["data"]["id"].as_i64().unwrap();

        let resp = ctx
            .call(
                test::TestRequest::get()
                    .uri("/api/v1/courses?search=eng&page=1&size=10")
                    .insert_header(bearer(&student_token)),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body(resp).await["data"]["pagination"]["total"], 1);

        let enroll_uri = format!("/api/v1/courses/{course_id}/enroll");
        let resp = ctx
            .call(
                test::TestRequest::post()
                    .uri(&enroll_uri)
                    .insert_header(bearer(&student_token)),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let resp = ctx
            .call(
                test::TestRequest::post()
                    .uri(&enroll_uri)
                    .insert_header(bearer(&student_token)),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let assignments_uri = format!("/api/v1/courses/{course_id}/assignments");
        let resp = ctx
            .call(
                test::TestRequest::post()
                    .uri(&assignments_uri)
                    .insert_header(bearer(&coach_token))
                    .set_json(json!({
                        "title": "Reading log",
                        "points_total": 50.0,
                        "is_published": true
                    })),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let assignment_id = body(resp).await["data"]["id"].as_i64().unwrap();

        let resp = ctx
            .call(
                test::TestRequest::post()
                    .uri(&assignments_uri)
                    .insert_header(bearer(&coach_token))
                    .set_json(json!({ "title": "Draft essay", "points_total": 100.0 })),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = ctx
            .call(
                test::TestRequest::get()
                    .uri(&assignments_uri)
                    .insert_header(bearer(&student_token)),
            )
            .await;
        assert_eq!(body(resp).await["data"]["items"].as_array().unwrap().len(), 1);
        let resp = ctx
            .call(
                test::TestRequest::get()
                    .uri(&assignments_uri)
                    .insert_header(bearer(&coach_token)),
            )
            .await;
        assert_eq!(body(resp).await["data"]["items"].as_array().unwrap().len(), 2);

        // 未选课的学员不能提交
        let submission = json!({ "assignment_id": assignment_id, "content": "Chapters 1-3" });
        let resp = ctx
            .call(
                test::TestRequest::post()
                    .uri("/api/v1/submissions")
                    .insert_header(bearer(&other_token))
                    .set_json(&submission),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = ctx
            .call(
                test::TestRequest::post()
                    .uri("/api/v1/submissions")
                    .insert_header(bearer(&student_token))
                    .set_json(&submission),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let json = body(resp).await;
        assert_eq!(json["data"]["is_late"], false);
        let submission_id = json["data"]["id"].as_i64().unwrap();

        let grade_uri = format!("/api/v1/submissions/{submission_id}/grade");
        let resp = ctx
            .call(
                test::TestRequest::post()
                    .uri(&grade_uri)
                    .insert_header(bearer(&coach_token))
                    .set_json(json!({ "points_earned": 60.0 })),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = ctx
            .call(
                test::TestRequest::post()
                    .uri(&grade_uri)
                    .insert_header(bearer(&coach_token))
                    .set_json(json!({ "points_earned": 45.0, "feedback": "Solid work" })),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(body(resp).await["data"]["letter_grade"], "A-");

        let resp = ctx
            .call(
                test::TestRequest::post()
                    .uri(&grade_uri)
                    .insert_header(bearer(&coach_token))
                    .set_json(json!({ "points_earned": 50.0 })),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let grades_uri = format!("/api/v1/users/{}/grades", student.id);
        let resp = ctx
            .call(
                test::TestRequest::get()
                    .uri(&grades_uri)
                    .insert_header(bearer(&student_token)),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body(resp).await["data"]["pagination"]["total"], 1);

        let resp = ctx
            .call(
                test::TestRequest::get()
                    .uri(&grades_uri)
                    .insert_header(bearer(&other_token)),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = ctx
            .call(
                test::TestRequest::get()
                    .uri(&format!("/api/v1/users/{}/submissions?status=graded", student.id))
                    .insert_header(bearer(&student_token)),
            )
            .await;
        assert_eq!(body(resp).await["data"]["pagination"]["total"], 1);

        let resp = ctx
            .call(
                test::TestRequest::post()
                    .uri(&format!(
                        "/api/v1/courses/{course_id}/enrollments/{}/complete",
                        student.id
                    ))
                    .insert_header(bearer(&coach_token)),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body(resp).await;
        assert_eq!(json["data"]["enrollment"]["status"], "completed");
        assert_eq!(json["data"]["enrollment"]["letter_grade"], "A-");

        let resp = ctx
            .call(
                test::TestRequest::get()
                    .uri(&format!("/api/v1/users/{}/transcript", student.id))
                    .insert_header(bearer(&student_token)),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body(resp).await;
        assert_eq!(json["data"]["gpa"], 3.7);
        assert_eq!(json["data"]["ncaa"]["eligible"], false);
        assert_eq!(
            json["data"]["ncaa"]["reason"],
            "Only 1/16 core courses completed"
        );
    }

    #[actix_web::test]
    async fn test_notifications_are_scoped_to_owner() {
        use crate::models::notifications::{
            entities::NotificationType, requests::NewNotification,
        };

        let ctx = TestContext::new().await;
        let (owner, owner_token) = ctx.user("athlete_03", UserRole::Student).await;
        let (_other, other_token) = ctx.user("athlete_04", UserRole::Student).await;

        let mut ids = Vec::new();
        for title in ["Welcome", "Combine schedule"] {
            let notification = ctx
                .storage
                .create_notification(NewNotification {
                    user_id: owner.id,
                    notification_type: NotificationType::System,
                    title: title.to_string(),
                    content: None,
                    reference_type: None,
                    reference_id: None,
                })
                .await
                .unwrap();
            ids.push(notification.id);
        }

        let resp = ctx
            .call(
                test::TestRequest::get()
                    .uri("/api/v1/notifications/unread-count")
                    .insert_header(bearer(&owner_token)),
            )
            .await;
        assert_eq!(body(resp).await["data"]["unread_count"], 2);

        let read_uri = format!("/api/v1/notifications/{}/read", ids[0]);
        let resp = ctx
            .call(
                test::TestRequest::put()
                    .uri(&read_uri)
                    .insert_header(bearer(&other_token)),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = ctx
            .call(
                test::TestRequest::put()
                    .uri(&read_uri)
                    .insert_header(bearer(&owner_token)),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = ctx
            .call(
                test::TestRequest::get()
                    .uri("/api/v1/notifications?unread_only=true")
                    .insert_header(bearer(&owner_token)),
            )
            .await;
        assert_eq!(body(resp).await["data"]["pagination"]["total"], 1);

        let resp = ctx
            .call(
                test::TestRequest::put()
                    .uri("/api/v1/notifications/read-all")
                    .insert_header(bearer(&owner_token)),
            )
            .await;
        assert_eq!(body(resp).await["data"]["updated"], 1);
    }

    #[actix_web::test]
    async fn test_offer_pick_win_and_stats() {
        let ctx = TestContext::new().await;
        let (_coach, coach_token) = ctx.user("coach_02", UserRole::Instructor).await;
        let (_student, student_token) = ctx.user("athlete_05", UserRole::Student).await;

        let resp = ctx
            .call(
                test::TestRequest::post()
                    .uri("/api/v1/offers/enrollment_banner/pick")
                    .insert_header(bearer(&student_token))
                    .set_json(json!({ "mode": "forced", "variant": "combine_discount" })),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body(resp).await["data"]["variant"], "combine_discount");

        // 空请求体按加权模式
        let resp = ctx
            .call(
                test::TestRequest::post()
                    .uri("/api/v1/offers/enrollment_banner/pick")
                    .insert_header(bearer(&student_token)),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let variant = body(resp).await["data"]["variant"].as_str().unwrap().to_string();
        assert!(["free_trial_week", "scholarship_consult", "combine_discount"].contains(&variant.as_str()));

        let resp = ctx
            .call(
                test::TestRequest::post()
                    .uri("/api/v1/offers/enrollment_banner/pick")
                    .insert_header(bearer(&student_token))
                    .set_json(json!({ "mode": "forced", "variant": "nope" })),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = ctx
            .call(
                test::TestRequest::post()
                    .uri("/api/v1/offers/enrollment_banner/win")
                    .insert_header(bearer(&student_token))
                    .set_json(json!({ "variant": "combine_discount" })),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body(resp).await["data"]["wins"], 1);

        let resp = ctx
            .call(
                test::TestRequest::get()
                    .uri("/api/v1/offers/enrollment_banner/stats")
                    .insert_header(bearer(&student_token)),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = ctx
            .call(
                test::TestRequest::get()
                    .uri("/api/v1/offers/enrollment_banner/stats")
                    .insert_header(bearer(&coach_token)),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body(resp).await;
        let impressions: u64 = json["data"]["variants"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["impressions"].as_u64().unwrap())
            .sum();
        assert_eq!(impressions, 2);

        let resp = ctx
            .call(
                test::TestRequest::get()
                    .uri("/api/v1/offers/unknown/stats")
                    .insert_header(bearer(&coach_token)),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        // 事件已追加写入
        let tallies = ctx.storage.aggregate_offer_events().await.unwrap();
        let total_impressions: u64 = tallies.iter().map(|t| t.impressions).sum();
        let total_wins: u64 = tallies.iter().map(|t| t.wins).sum();
        assert_eq!((total_impressions, total_wins), (2, 1));
    }

    #[actix_web::test]
    async fn test_course_search_treats_wildcards_literally() {
        let ctx = TestContext::new().await;
        let (_coach, coach_token) = ctx.user("coach_03", UserRole::Instructor).await;

        // 第二门课只在 `_` 与 `%` 被当作通配符时才会命中
        for (title, code) in [
            ("Speed_Drills 100% Effort", "PE-201"),
            ("Speed Drills 1000 Effort", "PE-202"),
        ] {
            let resp = post(
                &ctx,
                "/api/v1/courses",
                &coach_token,
                json!({ "title": title, "code": code, "credits": 0.5 }),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        for query in ["Speed_Drills", "100%25", "drills%20100%25"] {
            let resp = ctx
                .call(
                    test::TestRequest::get()
                        .uri(&format!("/api/v1/courses?search={query}"))
                        .insert_header(bearer(&coach_token)),
                )
                .await;
            assert_eq!(resp.status(), StatusCode::OK);
            let json = body(resp).await;
            assert_eq!(json["data"]["pagination"]["total"], 1, "search={query}");
            assert_eq!(json["data"]["items"][0]["code"], "PE-201");
        }

        let resp = ctx
            .call(
                test::TestRequest::get()
                    .uri("/api/v1/courses?search=speed")
                    .insert_header(bearer(&coach_token)),
            )
            .await;
        assert_eq!(body(resp).await["data"]["pagination"]["total"], 2);
    }

    #[actix_web::test]
    async fn test_late_submission_is_deducted_or_rejected() {
        use crate::models::ErrorCode;

        let ctx = TestContext::new().await;
        let (_coach, coach_token) = ctx.user("coach_04", UserRole::Instructor).await;
        let (_student, student_token) = ctx.user("athlete_06", UserRole::Student).await;
        let course_id = course_with_student(&ctx, &coach_token, &student_token, "PE-301").await;
        let assignments_uri = format!("/api/v1/courses/{course_id}/assignments");

        let resp = post(
            &ctx,
            &assignments_uri,
            &coach_token,
            json!({
                "title": "Sprint log",
                "points_total": 100.0,
                "due_date": "2020-01-01T00:00:00Z",
                "allow_late_submission": true,
                "late_deduction": 10.0,
                "is_published": true
            }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let late_ok = body(resp).await["data"]["id"].as_i64().unwrap();

        let resp = post(
            &ctx,
            "/api/v1/submissions",
            &student_token,
            json!({ "assignment_id": late_ok, "content": "40m splits" }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let json = body(resp).await;
        assert_eq!(json["data"]["is_late"], true);
        let submission_id = json["data"]["id"].as_i64().unwrap();

        let resp = post(
            &ctx,
            &format!("/api/v1/submissions/{submission_id}/grade"),
            &coach_token,
            json!({ "points_earned": 90.0 }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let json = body(resp).await;
        assert_eq!(json["data"]["points_earned"], 81.0);
        assert_eq!(json["data"]["percentage"], 81.0);
        assert_eq!(json["data"]["letter_grade"], "B-");

        let resp = post(
            &ctx,
            &assignments_uri,
            &coach_token,
            json!({
                "title": "Film review",
                "points_total": 100.0,
                "due_date": "2020-01-01T00:00:00Z",
                "allow_late_submission": false,
                "is_published": true
            }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let closed = body(resp).await["data"]["id"].as_i64().unwrap();

        let resp = post(
            &ctx,
            "/api/v1/submissions",
            &student_token,
            json!({ "assignment_id": closed, "content": "Notes" }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(resp).await["code"], ErrorCode::AssignmentClosed as i32);
    }

    #[actix_web::test]
    async fn test_resubmission_counts_once_in_final_grade() {
        let ctx = TestContext::new().await;
        let (_coach, coach_token) = ctx.user("coach_05", UserRole::Instructor).await;
        let (student, student_token) = ctx.user("athlete_08", UserRole::Student).await;
        let course_id = course_with_student(&ctx, &coach_token, &student_token, "PE-401").await;
        let assignments_uri = format!("/api/v1/courses/{course_id}/assignments");

        let mut assignment_ids = Vec::new();
        for title in ["Quiz A", "Quiz B"] {
            let resp = post(
                &ctx,
                &assignments_uri,
                &coach_token,
                json!({ "title": title, "points_total": 100.0, "is_published": true }),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::CREATED);
            assignment_ids.push(body(resp).await["data"]["id"].as_i64().unwrap());
        }

        // Quiz A 提交两次且都拿满分，Quiz B 零分
        for (assignment_id, points) in [
            (assignment_ids[0], 100.0),
            (assignment_ids[0], 100.0),
            (assignment_ids[1], 0.0),
        ] {
            let resp = post(
                &ctx,
                "/api/v1/submissions",
                &student_token,
                json!({ "assignment_id": assignment_id, "content": "Answers" }),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::CREATED);
            let submission_id = body(resp).await["data"]["id"].as_i64().unwrap();

            let resp = post(
                &ctx,
                &format!("/api/v1/submissions/{submission_id}/grade"),
                &coach_token,
                json!({ "points_earned": points }),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let resp = ctx
            .call(
                test::TestRequest::post()
                    .uri(&format!(
                        "/api/v1/courses/{course_id}/enrollments/{}/complete",
                        student.id
                    ))
                    .insert_header(bearer(&coach_token)),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body(resp).await;
        assert_eq!(json["data"]["graded_assignments"], 2);
        assert_eq!(json["data"]["enrollment"]["final_percentage"], 50.0);
        assert_eq!(json["data"]["enrollment"]["letter_grade"], "F");
    }
}
