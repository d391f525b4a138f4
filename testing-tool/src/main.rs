use anyhow::Result;
use chrono::{Duration, Utc};
use colored::*;
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};

/// Recorrido completo de la API contra un servidor en marcha.
///
/// Uso: `testing-tool [BASE_URL]` (por defecto `API_BASE_URL` o
/// `http://localhost:8001`).
#[tokio::main]
async fn main() -> Result<()> {
    let base_url = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("API_BASE_URL").ok())
        .unwrap_or_else(|| "http://localhost:8001".to_string());

    println!("{}", "🚛 Truck Driver Training API - Smoke Tests".bright_blue().bold());
    println!("{}", "==========================================".bright_blue());
    println!("🌐 {}", base_url);
    println!();

    let mut runner = SmokeRunner::new(&base_url)?;
    runner.run_all().await;

    println!();
    println!("{}", "==========================================".bright_blue());
    println!(
        "{}",
        format!("📊 Resultado: {}/{} pruebas OK", runner.passed, runner.run).bold()
    );

    if runner.passed == runner.run {
        println!("{}", "🎉 Todas las pruebas pasaron".bright_green());
        Ok(())
    } else {
        println!(
            "{}",
            format!("⚠️ {} prueba(s) fallaron", runner.run - runner.passed).bright_red()
        );
        std::process::exit(1);
    }
}

struct SmokeRunner {
    client: Client,
    api_url: String,
    run: usize,
    passed: usize,
    driver_id: Option<String>,
    module_id: Option<String>,
    progress_id: Option<String>,
}

impl SmokeRunner {
    fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            api_url: format!("{}/api", base_url.trim_end_matches('/')),
            run: 0,
            passed: 0,
            driver_id: None,
            module_id: None,
            progress_id: None,
        })
    }

    fn log(&mut self, name: &str, success: bool, details: &str) -> bool {
        self.run += 1;
        if success {
            self.passed += 1;
            println!("{} {} {}", "✅".green(), name.bold(), details.dimmed());
        } else {
            println!("{} {} {}", "❌".red(), name.bold(), details.bright_red());
        }
        success
    }

    /// Devuelve el cuerpo si el status coincide con el esperado
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        expected: StatusCode,
    ) -> Result<Value, String> {
        let url = format!("{}/{}", self.api_url, endpoint);
        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| e.to_string())?;
        let status = response.status();
        let text = response.text().await.map_err(|e| e.to_string())?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        if status == expected {
            Ok(body)
        } else {
            Err(format!("status {} (esperado {}): {}", status, expected, body))
        }
    }

    async fn check<F>(&mut self, name: &str, method: Method, endpoint: &str, body: Option<Value>, verify: F) -> Option<Value>
    where
        F: FnOnce(&Value) -> Result<String, String>,
    {
        match self.request(method, endpoint, body, StatusCode::OK).await {
            Ok(value) => match verify(&value) {
                Ok(details) => {
                    self.log(name, true, &details);
                    Some(value)
                }
                Err(details) => {
                    self.log(name, false, &details);
                    None
                }
            },
            Err(details) => {
                self.log(name, false, &details);
                None
            }
        }
    }

    async fn run_all(&mut self) {
        self.api_root().await;
        self.dashboard_summary().await;
        self.initialize_modules().await;
        self.list_modules().await;
        self.create_driver().await;
        self.list_drivers().await;
        self.get_driver().await;
        self.assign_training().await;
        self.duplicate_assignment().await;
        self.list_progress().await;
        self.update_progress().await;
        self.create_certification().await;
        self.list_certifications().await;
        self.expiring_certifications().await;
        self.driver_analytics().await;
        self.compliance_report().await;
    }

    async fn api_root(&mut self) {
        self.check("API root", Method::GET, "", None, |body| {
            body["message"]
                .as_str()
                .map(|m| format!("- {}", m))
                .ok_or_else(|| "sin mensaje".to_string())
        })
        .await;
    }

    async fn dashboard_summary(&mut self) {
        self.check("Dashboard summary", Method::GET, "dashboard/summary", None, |body| {
            let fields = [
                "total_drivers",
                "active_drivers",
                "total_training_modules",
                "drivers_with_expired_certifications",
                "drivers_with_expiring_certifications",
                "overall_completion_rate",
                "recent_completions",
            ];
            match fields.iter().find(|f| body.get(**f).is_none()) {
                Some(missing) => Err(format!("falta el campo {}", missing)),
                None => Ok(format!("- {} conductores activos", body["active_drivers"])),
            }
        })
        .await;
    }

    async fn initialize_modules(&mut self) {
        self.check(
            "Initialize default modules",
            Method::POST,
            "training-modules/initialize-defaults",
            Some(json!({})),
            |body| Ok(format!("- {}", body["message"])),
        )
        .await;
    }

    async fn list_modules(&mut self) {
        let modules = self
            .check("List training modules", Method::GET, "training-modules", None, |body| {
                let count = body.as_array().map(Vec::len).unwrap_or(0);
                if count >= 8 {
                    Ok(format!("- {} módulos", count))
                } else {
                    Err(format!("se esperaban al menos 8 módulos, hay {}", count))
                }
            })
            .await;

        self.module_id = modules
            .and_then(|m| m.get(0).cloned())
            .and_then(|m| m["id"].as_str().map(str::to_string));
    }

    async fn create_driver(&mut self) {
        let today = Utc::now().date_naive();
        let suffix = Utc::now().timestamp();
        let payload = json!({
            "employee_id": format!("EMP{}", suffix),
            "first_name": "John",
            "last_name": "Smith",
            "email": format!("john.smith.{}@company.com", suffix),
            "phone": "555-0123",
            "hire_date": "2023-01-15",
            "license_number": format!("CDL{}", suffix),
            "license_class": "CDL Class A",
            "license_expiry": (today + Duration::days(730)).to_string(),
            "date_of_birth": "1985-06-20",
            "address": "123 Main St, Anytown, ST 12345",
            "emergency_contact_name": "Jane Smith",
            "emergency_contact_phone": "555-0124"
        });

        let driver = self
            .check("Create driver", Method::POST, "drivers", Some(payload), |body| {
                body["id"]
                    .as_str()
                    .map(|id| format!("- id {}", id))
                    .ok_or_else(|| "respuesta sin id".to_string())
            })
            .await;
        self.driver_id = driver.and_then(|d| d["id"].as_str().map(str::to_string));
    }

    async fn list_drivers(&mut self) {
        let expected = self.driver_id.clone();
        self.check("List drivers", Method::GET, "drivers", None, move |body| {
            let drivers = body.as_array().cloned().unwrap_or_default();
            let found = expected
                .as_deref()
                .map(|id| drivers.iter().any(|d| d["id"] == id))
                .unwrap_or(true);
            if found {
                Ok(format!("- {} conductores", drivers.len()))
            } else {
                Err("el conductor creado no aparece".to_string())
            }
        })
        .await;
    }

    async fn get_driver(&mut self) {
        let Some(driver_id) = self.driver_id.clone() else {
            self.log("Get driver by id", false, "no hay conductor creado");
            return;
        };
        let endpoint = format!("drivers/{}", driver_id);
        self.check("Get driver by id", Method::GET, &endpoint, None, |body| {
            Ok(format!("- {} {}", body["first_name"], body["last_name"]))
        })
        .await;
    }

    async fn assign_training(&mut self) {
        let (Some(driver_id), Some(module_id)) = (self.driver_id.clone(), self.module_id.clone())
        else {
            self.log("Assign training", false, "faltan conductor o módulo");
            return;
        };
        let progress = self
            .check(
                "Assign training",
                Method::POST,
                "training-progress",
                Some(json!({ "driver_id": driver_id, "module_id": module_id })),
                |body| Ok(format!("- estado {}", body["status"])),
            )
            .await;
        self.progress_id = progress.and_then(|p| p["id"].as_str().map(str::to_string));
    }

    async fn duplicate_assignment(&mut self) {
        let (Some(driver_id), Some(module_id)) = (self.driver_id.clone(), self.module_id.clone())
        else {
            return;
        };
        let result = self
            .request(
                Method::POST,
                "training-progress",
                Some(json!({ "driver_id": driver_id, "module_id": module_id })),
                StatusCode::BAD_REQUEST,
            )
            .await;
        match result {
            Ok(body) => self.log("Reject duplicate assignment", true, &format!("- {}", body["message"])),
            Err(details) => self.log("Reject duplicate assignment", false, &details),
        };
    }

    async fn list_progress(&mut self) {
        let endpoint = match &self.driver_id {
            Some(id) => format!("training-progress?driver_id={}", id),
            None => "training-progress".to_string(),
        };
        self.check("List training progress", Method::GET, &endpoint, None, |body| {
            Ok(format!("- {} registros", body.as_array().map(Vec::len).unwrap_or(0)))
        })
        .await;
    }

    async fn update_progress(&mut self) {
        let Some(progress_id) = self.progress_id.clone() else {
            self.log("Update training progress", false, "no hay progreso creado");
            return;
        };
        let endpoint = format!("training-progress/{}", progress_id);
        let payload = json!({
            "status": "completed",
            "score": 95,
            "instructor_notes": "Excellent performance"
        });
        self.check("Update training progress", Method::PUT, &endpoint, Some(payload), |body| {
            if body["status"] == "completed" && !body["completion_date"].is_null() {
                Ok(format!("- intentos {}", body["attempts"]))
            } else {
                Err(format!("respuesta inesperada: {}", body))
            }
        })
        .await;
    }

    async fn create_certification(&mut self) {
        let Some(driver_id) = self.driver_id.clone() else {
            self.log("Create certification", false, "no hay conductor creado");
            return;
        };
        let today = Utc::now().date_naive();
        let payload = json!({
            "driver_id": driver_id,
            "certification_name": "DOT Medical Certificate",
            "certification_type": "Medical",
            "issue_date": (today - Duration::days(700)).to_string(),
            "expiry_date": (today + Duration::days(25)).to_string(),
            "issuing_authority": "DOT Medical Examiner",
            "certificate_number": format!("MED{}", Utc::now().timestamp())
        });
        self.check("Create certification", Method::POST, "certifications", Some(payload), |body| {
            if body["status"] == "expiring_soon" {
                Ok("- estado expiring_soon".to_string())
            } else {
                Err(format!("estado inesperado: {}", body["status"]))
            }
        })
        .await;
    }

    async fn list_certifications(&mut self) {
        self.check("List certifications", Method::GET, "certifications", None, |body| {
            Ok(format!("- {} certificaciones", body.as_array().map(Vec::len).unwrap_or(0)))
        })
        .await;
    }

    async fn expiring_certifications(&mut self) {
        self.check(
            "Expiring certifications",
            Method::GET,
            "certifications/expiring",
            None,
            |body| {
                let items = body.as_array().cloned().unwrap_or_default();
                if items.iter().all(|c| c.get("driver_name").is_some()) {
                    Ok(format!("- {} por vencer o vencidas", items.len()))
                } else {
                    Err("falta driver_name".to_string())
                }
            },
        )
        .await;
    }

    async fn driver_analytics(&mut self) {
        let Some(driver_id) = self.driver_id.clone() else {
            self.log("Driver analytics", false, "no hay conductor creado");
            return;
        };
        let endpoint = format!("analytics/driver-progress/{}", driver_id);
        self.check("Driver analytics", Method::GET, &endpoint, None, |body| {
            let stats = &body["training_stats"];
            if stats["completion_rate"] == 100.0 && stats["average_score"] == 95.0 {
                Ok(format!("- {} asignados", stats["total_assigned"]))
            } else {
                Err(format!("estadísticas inesperadas: {}", stats))
            }
        })
        .await;
    }

    async fn compliance_report(&mut self) {
        self.check(
            "Compliance report",
            Method::GET,
            "analytics/compliance-report",
            None,
            |body| {
                let records = body.as_array().cloned().unwrap_or_default();
                let compliant = records
                    .iter()
                    .filter(|r| r["compliance_status"] == "Compliant")
                    .count();
                Ok(format!("- {}/{} en cumplimiento", compliant, records.len()))
            },
        )
        .await;
    }
}
